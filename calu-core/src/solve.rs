//! Triangular solve module.

use crate::{
    mul::{matmul_unchecked, Accum},
    ExactField, MatMut, MatRef,
};
use assert2::{assert as fancy_assert, debug_assert as fancy_debug_assert};
use reborrow::*;

#[inline]
fn recursion_threshold() -> usize {
    4
}

unsafe fn solve_unit_lower_triangular_in_place_base_case_unchecked<T: ExactField>(
    tril: MatRef<'_, T>,
    rhs: MatMut<'_, T>,
) {
    let mut rhs = rhs;
    let n = tril.nrows();
    let k = rhs.ncols();

    for j in 0..k {
        for i in 1..n {
            for depth in 0..i {
                let prod = tril
                    .get_unchecked(i, depth)
                    .calu_mul(rhs.rb().get_unchecked(depth, j));
                let x = rhs.rb_mut().get_unchecked(i, j);
                *x = x.calu_sub(&prod);
            }
        }
    }
}

/// Computes the solution of `triangular_lower * X = rhs`, and stores the result in `rhs`.
///
/// `triangular_lower` is interpreted as a unit lower triangular matrix: its diagonal is implicitly
/// one, and only its strictly lower triangular part is read.
///
/// # Panics
///
///  - Panics if `triangular_lower` is not a square matrix.
///  - Panics if `rhs.nrows() != triangular_lower.ncols()`
///
/// # Example
///
/// ```
/// use calu_core::{
///     mat,
///     mul::{matmul, Accum},
///     solve::solve_unit_lower_triangular_in_place,
///     Mat,
/// };
/// use num_rational::Rational64;
///
/// let q = Rational64::from_integer;
/// // the upper part and the diagonal are ignored
/// let m = mat![[q(9), q(9)], [q(2), q(9)]];
/// let rhs = mat![[q(4), q(5), q(6)], [q(7), q(8), q(9)]];
///
/// let mut sol = rhs.clone();
/// solve_unit_lower_triangular_in_place(m.as_ref(), sol.as_mut());
///
/// assert_eq!(sol, mat![[q(4), q(5), q(6)], [q(-1), q(-2), q(-3)]]);
///
/// let unit_lower = mat![[q(1), q(0)], [q(2), q(1)]];
/// let mut prod = Mat::zeros(2, 3);
/// matmul(prod.as_mut(), Accum::Replace, unit_lower.as_ref(), sol.as_ref());
/// assert_eq!(prod, rhs);
/// ```
#[track_caller]
#[inline]
pub fn solve_unit_lower_triangular_in_place<T: ExactField>(
    triangular_lower: MatRef<'_, T>,
    rhs: MatMut<'_, T>,
) {
    fancy_assert!(triangular_lower.nrows() == triangular_lower.ncols());
    fancy_assert!(rhs.nrows() == triangular_lower.ncols());

    unsafe { solve_unit_lower_triangular_in_place_unchecked(triangular_lower, rhs) }
}

/// # Safety
///
/// Same as [`solve_unit_lower_triangular_in_place`], except that panics become undefined behavior.
pub unsafe fn solve_unit_lower_triangular_in_place_unchecked<T: ExactField>(
    tril: MatRef<'_, T>,
    rhs: MatMut<'_, T>,
) {
    fancy_debug_assert!(tril.nrows() == tril.ncols());
    fancy_debug_assert!(rhs.nrows() == tril.ncols());

    let n = tril.nrows();
    if n <= recursion_threshold() {
        solve_unit_lower_triangular_in_place_base_case_unchecked(tril, rhs);
        return;
    }

    let bs = n / 2;

    let (tril_top_left, _, tril_bot_left, tril_bot_right) = tril.split_at_unchecked(bs, bs);
    let (_, mut rhs_top, _, mut rhs_bot) = rhs.split_at_unchecked(bs, 0);

    //  (A00    )   X0   (B0)
    //  (A10 A11)   X1 = (B1)
    //
    // 1. A00 X0 = B0
    //
    // 2. A10 X0 + A11 X1 = B1
    // => A11 X1 = B1 - A10 X0

    solve_unit_lower_triangular_in_place_unchecked(tril_top_left, rhs_top.rb_mut());

    matmul_unchecked(
        rhs_bot.rb_mut(),
        Accum::Sub,
        tril_bot_left,
        rhs_top.into_const(),
    );

    solve_unit_lower_triangular_in_place_unchecked(tril_bot_right, rhs_bot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mul::matmul, Mat};
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn q(x: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(x))
    }

    fn random_small() -> BigRational {
        q(rand::random::<i8>() as i64)
    }

    #[test]
    fn test_unit_lower() {
        for (n, k) in [(0, 3), (1, 2), (3, 3), (10, 4), (17, 1)] {
            // garbage above and on the diagonal must not be read
            let stored = Mat::with_dims(|_, _| random_small(), n, n);
            let unit_lower = Mat::with_dims(
                |i, j| {
                    if i == j {
                        q(1)
                    } else if i > j {
                        stored[(i, j)].clone()
                    } else {
                        q(0)
                    }
                },
                n,
                n,
            );
            let rhs = Mat::with_dims(|_, _| random_small(), n, k);

            let mut sol = rhs.clone();
            solve_unit_lower_triangular_in_place(stored.as_ref(), sol.as_mut());

            let mut prod = Mat::zeros(n, k);
            matmul(
                prod.as_mut(),
                Accum::Replace,
                unit_lower.as_ref(),
                sol.as_ref(),
            );
            fancy_assert!(prod == rhs);
        }
    }

    #[test]
    fn solve_in_strided_window() {
        let n = 6;
        let mut storage = Mat::with_dims(|i, j| q((i as i64 - j as i64) * 3 + 1), n, 2 * n);
        let tril = storage.as_ref().submatrix(0, 0, n, n).to_owned();
        let rhs = storage.as_ref().submatrix(0, n, n, n).to_owned();

        {
            let (left, right, _, _) = storage.as_mut().split_at(n, n);
            solve_unit_lower_triangular_in_place(left.into_const(), right);
        }

        let mut expected = rhs;
        solve_unit_lower_triangular_in_place(tril.as_ref(), expected.as_mut());
        fancy_assert!(storage.as_ref().submatrix(0, n, n, n) == expected.as_ref());
    }
}
