//! Elementwise subtraction.

use crate::{ExactField, MatMut, MatRef};
use assert2::assert as fancy_assert;
use reborrow::*;

/// Computes `dst := dst - rhs`.
///
/// # Panics
///
/// Panics if `dst` and `rhs` don't have the same shape.
#[track_caller]
pub fn sub_in_place<T: ExactField>(dst: MatMut<'_, T>, rhs: MatRef<'_, T>) {
    fancy_assert!((dst.nrows(), dst.ncols()) == (rhs.nrows(), rhs.ncols()));

    let mut dst = dst;
    for j in 0..dst.ncols() {
        for i in 0..dst.nrows() {
            // SAFETY: bounds have been checked
            unsafe {
                let dst = dst.rb_mut().get_unchecked(i, j);
                *dst = dst.calu_sub(rhs.get_unchecked(i, j));
            }
        }
    }
}
