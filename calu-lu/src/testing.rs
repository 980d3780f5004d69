//! Helpers shared by the test modules of this crate.

use calu_core::{
    mul::{matmul, Accum},
    ExactField, Mat, MatRef, ZeroCheck,
};
use core::cmp::Ordering;
use num_bigint::BigInt;
use num_rational::BigRational;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

pub fn q(x: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(x))
}

pub fn int_mat(rows: &[&[i64]]) -> Mat<BigRational> {
    Mat::from_rows(
        rows.iter()
            .map(|row| row.iter().copied().map(q).collect())
            .collect(),
    )
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_mat(rng: &mut StdRng, m: usize, n: usize) -> Mat<BigRational> {
    Mat::with_dims(|_, _| q(rng.gen_range(-9..=9)), m, n)
}

fn shuffled(rng: &mut StdRng, len: usize) -> Vec<usize> {
    let mut perm = (0..len).collect::<Vec<_>>();
    perm.shuffle(rng);
    perm
}

/// Returns a random `m×n` matrix of rank exactly `r`.
///
/// The matrix is `B C`. The rows of `B` whose shuffled index is below `r` form a unit lower
/// triangular block and the columns of `C` whose shuffled index is below `r` form a unit upper
/// triangular block, so both factors have full rank `r`. Every other entry is random.
pub fn low_rank_mat(rng: &mut StdRng, m: usize, n: usize, r: usize) -> Mat<BigRational> {
    assert!(r <= m.min(n));

    let row_perm = shuffled(rng, m);
    let col_perm = shuffled(rng, n);

    let b = Mat::with_dims(
        |i, j| {
            let i = row_perm[i];
            if i < r && i <= j {
                q((i == j) as i64)
            } else {
                q(rng.gen_range(-4..=4))
            }
        },
        m,
        r,
    );
    let c = Mat::with_dims(
        |i, j| {
            let j = col_perm[j];
            if j < r && j <= i {
                q((i == j) as i64)
            } else {
                q(rng.gen_range(-4..=4))
            }
        },
        r,
        n,
    );

    let mut a = Mat::zeros(m, n);
    matmul(a.as_mut(), Accum::Replace, b.as_ref(), c.as_ref());
    a
}

/// Returns a random `n×n` invertible matrix `P L U`, with `L` unit lower triangular, `U` upper
/// triangular with a nonzero diagonal, and `P` a random row permutation.
pub fn full_rank_mat(rng: &mut StdRng, n: usize) -> Mat<BigRational> {
    let l = Mat::with_dims(
        |i, j| match i.cmp(&j) {
            Ordering::Greater => q(rng.gen_range(-4..=4)),
            Ordering::Equal => q(1),
            Ordering::Less => q(0),
        },
        n,
        n,
    );
    let u = Mat::with_dims(
        |i, j| match i.cmp(&j) {
            Ordering::Less => q(rng.gen_range(-4..=4)),
            Ordering::Equal => {
                let d = rng.gen_range(1..=3);
                q(if rng.gen_bool(0.5) { d } else { -d })
            }
            Ordering::Greater => q(0),
        },
        n,
        n,
    );
    let mut lu = Mat::zeros(n, n);
    matmul(lu.as_mut(), Accum::Replace, l.as_ref(), u.as_ref());

    let row_perm = shuffled(rng, n);
    Mat::with_dims(|i, j| lu[(row_perm[i], j)].clone(), n, n)
}

/// Counts the rows of `a` with more than one nonzero entry.
pub fn dense_rows(a: MatRef<'_, BigRational>) -> usize {
    (0..a.nrows())
        .filter(|&i| (0..a.ncols()).filter(|&j| a[(i, j)] != q(0)).count() > 1)
        .count()
}

/// Computes the rank with a plain fraction-based Gaussian elimination.
pub fn reference_rank(a: MatRef<'_, BigRational>) -> usize {
    let mut rows = (0..a.nrows())
        .map(|i| (0..a.ncols()).map(|j| a[(i, j)].clone()).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut rank = 0;
    for col in 0..a.ncols() {
        let pivot = match (rank..rows.len()).find(|&i| rows[i][col] != q(0)) {
            Some(pivot) => pivot,
            None => continue,
        };
        rows.swap(rank, pivot);

        let pivot_row = rows[rank].clone();
        for row in rows[rank + 1..].iter_mut() {
            let factor = &row[col] / &pivot_row[col];
            for (x, p) in row.iter_mut().zip(&pivot_row) {
                *x -= &factor * p;
            }
        }
        rank += 1;
    }
    rank
}

/// Checks that the rows of `lu` from `rank` onwards are zero from column `rank` onwards.
pub fn has_zero_trailing_block(lu: MatRef<'_, BigRational>, rank: usize) -> bool {
    (rank..lu.nrows()).all(|i| (rank..lu.ncols()).all(|j| lu[(i, j)] == q(0)))
}

/// Rational number whose zero test refuses to answer once it has been marked as opaque.
/// Opacity is contagious through arithmetic.
#[derive(Clone, Debug, PartialEq)]
pub struct Opaque {
    pub value: BigRational,
    pub opaque: bool,
}

impl Opaque {
    pub fn known(x: i64) -> Self {
        Self {
            value: q(x),
            opaque: false,
        }
    }

    pub fn hidden(x: i64) -> Self {
        Self {
            value: q(x),
            opaque: true,
        }
    }

    fn combine(&self, rhs: &Self, value: BigRational) -> Self {
        Self {
            value,
            opaque: self.opaque || rhs.opaque,
        }
    }
}

impl ExactField for Opaque {
    fn calu_zero() -> Self {
        Self::known(0)
    }
    fn calu_one() -> Self {
        Self::known(1)
    }

    fn calu_add(&self, rhs: &Self) -> Self {
        self.combine(rhs, &self.value + &rhs.value)
    }
    fn calu_sub(&self, rhs: &Self) -> Self {
        self.combine(rhs, &self.value - &rhs.value)
    }
    fn calu_mul(&self, rhs: &Self) -> Self {
        self.combine(rhs, &self.value * &rhs.value)
    }
    fn calu_inv(&self) -> Self {
        Self {
            value: self.value.recip(),
            opaque: self.opaque,
        }
    }

    fn calu_is_zero(&self) -> ZeroCheck {
        if self.opaque {
            ZeroCheck::Unknown
        } else {
            self.value.calu_is_zero()
        }
    }
}

pub fn opaque_mat(rows: &[&[Opaque]]) -> Mat<Opaque> {
    Mat::from_rows(rows.iter().map(|row| row.to_vec()).collect())
}
