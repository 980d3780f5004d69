use criterion::{criterion_group, criterion_main, Criterion};
use dyn_stack::{DynStack, GlobalMemBuffer};
use num_bigint::BigInt;
use num_rational::BigRational;
use rand::random;

use calu_core::{
    mul::{matmul, Accum},
    Mat,
};
use calu_lu::{classical, recursive, RecursiveLuParams};

fn random_full_rank(n: usize) -> Mat<BigRational> {
    let q = |x: i64| BigRational::from_integer(BigInt::from(x));
    let l = Mat::with_dims(
        |i, j| match i.cmp(&j) {
            core::cmp::Ordering::Greater => q(random::<i8>() as i64),
            core::cmp::Ordering::Equal => q(1),
            core::cmp::Ordering::Less => q(0),
        },
        n,
        n,
    );
    let u = Mat::with_dims(
        |i, j| match i.cmp(&j) {
            core::cmp::Ordering::Less => q(random::<i8>() as i64),
            core::cmp::Ordering::Equal => q(1 + (random::<u8>() % 8) as i64),
            core::cmp::Ordering::Greater => q(0),
        },
        n,
        n,
    );
    let mut a = Mat::zeros(n, n);
    matmul(a.as_mut(), Accum::Replace, l.as_ref(), u.as_ref());
    a
}

pub fn lu(c: &mut Criterion) {
    for n in [8, 16, 32, 64] {
        let a = random_full_rank(n);

        c.bench_function(&format!("calu-recursive-lu-{n}"), |b| {
            let params = RecursiveLuParams::default();
            let mut lu = Mat::zeros(n, n);
            let mut perm = vec![0; n];
            let mut mem = GlobalMemBuffer::new(
                recursive::lu_recursive_req::<BigRational>(n, n, params).unwrap(),
            );

            b.iter(|| {
                recursive::lu_recursive(
                    lu.as_mut(),
                    a.as_ref(),
                    &mut perm,
                    true,
                    params,
                    DynStack::new(&mut mem),
                )
                .unwrap();
            })
        });

        c.bench_function(&format!("calu-classical-lu-{n}"), |b| {
            let mut lu = Mat::zeros(n, n);
            let mut perm = vec![0; n];

            b.iter(|| {
                classical::lu_classical(lu.as_mut(), a.as_ref(), &mut perm, true).unwrap();
            })
        });
    }
}

criterion_group!(benches, lu);
criterion_main!(benches);
