//! Matrix multiplication.

use crate::{ExactField, MatMut, MatRef};
use assert2::{assert as fancy_assert, debug_assert as fancy_debug_assert};
use reborrow::*;

/// How the product is combined with the previous contents of the destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Accum {
    /// `dst := lhs * rhs`. The previous contents of `dst` are not read.
    Replace,
    /// `dst := dst + lhs * rhs`.
    Add,
    /// `dst := dst - lhs * rhs`.
    Sub,
}

/// Same as [`matmul`], except that panics become undefined behavior.
///
/// # Safety
///
/// Requires that
/// - `dst.nrows() == lhs.nrows()`,
/// - `dst.ncols() == rhs.ncols()`,
/// - `lhs.ncols() == rhs.nrows()`.
///
/// `dst` must not alias `lhs` or `rhs`.
#[inline]
pub unsafe fn matmul_unchecked<T: ExactField>(
    dst: MatMut<'_, T>,
    accum: Accum,
    lhs: MatRef<'_, T>,
    rhs: MatRef<'_, T>,
) {
    fancy_debug_assert!(dst.nrows() == lhs.nrows());
    fancy_debug_assert!(dst.ncols() == rhs.ncols());
    fancy_debug_assert!(lhs.ncols() == rhs.nrows());

    let mut dst = dst;
    let m = dst.nrows();
    let n = dst.ncols();
    let k = lhs.ncols();

    for j in 0..n {
        for i in 0..m {
            let mut acc: Option<T> = None;
            for depth in 0..k {
                let prod = lhs
                    .get_unchecked(i, depth)
                    .calu_mul(rhs.get_unchecked(depth, j));
                acc = Some(match acc {
                    Some(acc) => acc.calu_add(&prod),
                    None => prod,
                });
            }

            let dst = dst.rb_mut().get_unchecked(i, j);
            match (accum, acc) {
                (Accum::Replace, acc) => *dst = acc.unwrap_or_else(T::calu_zero),
                (_, None) => (),
                (Accum::Add, Some(acc)) => *dst = dst.calu_add(&acc),
                (Accum::Sub, Some(acc)) => *dst = dst.calu_sub(&acc),
            }
        }
    }
}

/// Computes the matrix product `lhs * rhs` and combines it with `dst` according to `accum`.
///
/// # Panics
///
/// Panics if the matrix dimensions are not compatible for matrix multiplication, i.e.
/// - `dst.nrows() == lhs.nrows()`,
/// - `dst.ncols() == rhs.ncols()`,
/// - `lhs.ncols() == rhs.nrows()`.
///
/// # Example
///
/// ```
/// use calu_core::{
///     mat,
///     mul::{matmul, Accum},
///     Mat,
/// };
/// use num_rational::Rational64;
///
/// let q = Rational64::from_integer;
/// let lhs = mat![[q(1), q(2)], [q(3), q(4)]];
/// let rhs = mat![[q(5)], [q(6)]];
///
/// let mut dst = mat![[q(1)], [q(1)]];
/// matmul(dst.as_mut(), Accum::Sub, lhs.as_ref(), rhs.as_ref());
///
/// assert_eq!(dst, mat![[q(-16)], [q(-38)]]);
/// ```
#[track_caller]
#[inline]
pub fn matmul<T: ExactField>(
    dst: MatMut<'_, T>,
    accum: Accum,
    lhs: MatRef<'_, T>,
    rhs: MatRef<'_, T>,
) {
    fancy_assert!(dst.nrows() == lhs.nrows());
    fancy_assert!(dst.ncols() == rhs.ncols());
    fancy_assert!(lhs.ncols() == rhs.nrows());
    unsafe { matmul_unchecked(dst, accum, lhs, rhs) }
}
