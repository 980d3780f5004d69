//! Row permutations.
//!
//! A permutation `perm` of length `m` is stored as an array of row indices. Applying it to a
//! matrix `src` produces the matrix whose `i`-th row is row `perm[i]` of `src`.

use assert2::{assert as fancy_assert, debug_assert as fancy_debug_assert};
use reborrow::*;

use crate::{MatMut, MatRef};

/// Swaps the two columns at indices `a` and `b` in the given matrix.
///
/// # Panics
///
/// Panics if either `a` or `b` is out of bounds.
///
/// # Example
///
/// ```
/// use calu_core::{mat, permutation::swap_cols};
/// use num_rational::Rational64;
///
/// let q = Rational64::from_integer;
/// let mut m = mat![[q(1), q(2), q(3)], [q(4), q(5), q(6)]];
///
/// swap_cols(m.as_mut(), 0, 2);
///
/// assert_eq!(m, mat![[q(3), q(2), q(1)], [q(6), q(5), q(4)]]);
/// ```
#[track_caller]
#[inline]
pub fn swap_cols<T>(mat: MatMut<'_, T>, a: usize, b: usize) {
    let m = mat.nrows();
    let n = mat.ncols();
    fancy_assert!(a < n);
    fancy_assert!(b < n);

    if a == b {
        return;
    }

    let rs = mat.row_stride();
    let cs = mat.col_stride();
    let ptr = mat.as_ptr();

    let ptr_a = ptr.wrapping_offset(cs * a as isize);
    let ptr_b = ptr.wrapping_offset(cs * b as isize);

    if rs == 1 {
        // SAFETY: the two columns are distinct and each is contiguous
        unsafe {
            core::ptr::swap_nonoverlapping(ptr_a, ptr_b, m);
        }
    } else {
        for i in 0..m {
            let offset = rs * i as isize;
            // SAFETY: `i < m`, and the two columns are distinct
            unsafe {
                core::ptr::swap_nonoverlapping(
                    ptr_a.wrapping_offset(offset),
                    ptr_b.wrapping_offset(offset),
                    1,
                );
            }
        }
    }
}

/// Swaps the two rows at indices `a` and `b` in the given matrix.
///
/// # Panics
///
/// Panics if either `a` or `b` is out of bounds.
#[track_caller]
#[inline]
pub fn swap_rows<T>(mat: MatMut<'_, T>, a: usize, b: usize) {
    swap_cols(mat.transpose(), a, b)
}

/// Returns `true` if `indices` contains every integer in `0..indices.len()` exactly once.
pub fn is_permutation(indices: &[usize]) -> bool {
    let mut seen = vec![false; indices.len()];
    for &i in indices {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Immutable view over a permutation and its inverse.
#[derive(Clone, Copy, Debug)]
pub struct PermutationRef<'a> {
    forward: &'a [usize],
    inverse: &'a [usize],
}

impl<'a> PermutationRef<'a> {
    /// Creates a new permutation reference, after checking that `forward` and `inverse` are
    /// permutations of the same length and inverses of each other.
    ///
    /// # Panics
    ///
    /// Panics if the inputs are not valid.
    #[track_caller]
    pub fn new(forward: &'a [usize], inverse: &'a [usize]) -> Self {
        fancy_assert!(forward.len() == inverse.len());
        fancy_assert!(is_permutation(forward));
        for (i, &p) in forward.iter().enumerate() {
            fancy_assert!(inverse[p] == i);
        }
        Self { forward, inverse }
    }

    /// Creates a new permutation reference, without checking the validity of the inputs.
    ///
    /// # Safety
    ///
    /// `forward` and `inverse` must have the same length, be valid permutations, and be inverse
    /// permutations of each other.
    #[inline]
    pub unsafe fn new_unchecked(forward: &'a [usize], inverse: &'a [usize]) -> Self {
        Self { forward, inverse }
    }

    /// Returns the permutation as an array.
    #[inline]
    pub fn into_arrays(self) -> (&'a [usize], &'a [usize]) {
        (self.forward, self.inverse)
    }

    #[inline]
    pub fn len(&self) -> usize {
        fancy_debug_assert!(self.inverse.len() == self.forward.len());
        self.forward.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the inverse permutation.
    #[inline]
    pub fn inverse(self) -> Self {
        Self {
            forward: self.inverse,
            inverse: self.forward,
        }
    }
}

impl<'short, 'a> Reborrow<'short> for PermutationRef<'a> {
    type Target = PermutationRef<'short>;

    #[inline]
    fn rb(&'short self) -> Self::Target {
        *self
    }
}

/// Computes a permutation of the rows of the source matrix using the given permutation, and
/// stores the result in the destination matrix, so that row `i` of `dst` is row `perm[i]` of
/// `src`.
///
/// # Panics
///
/// - Panics if the matrices do not have the same shape.
/// - Panics if the size of the permutation doesn't match the number of rows of the matrices.
#[track_caller]
pub fn permute_rows<T: Clone>(
    dst: MatMut<'_, T>,
    src: MatRef<'_, T>,
    perm_indices: PermutationRef<'_>,
) {
    fancy_assert!((src.nrows(), src.ncols()) == (dst.nrows(), dst.ncols()));
    fancy_assert!(perm_indices.len() == src.nrows());

    let mut dst = dst;
    let m = src.nrows();
    let n = src.ncols();

    let perm = perm_indices.into_arrays().0;

    for j in 0..n {
        for i in 0..m {
            // SAFETY: `perm` is a permutation of `0..m`, and `i < m`, `j < n`
            unsafe {
                dst.rb_mut()
                    .get_unchecked(i, j)
                    .clone_from(src.get_unchecked(*perm.get_unchecked(i), j));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mat;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn q(x: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(x))
    }

    #[test]
    fn swap_rows_strided() {
        let mut m = Mat::with_dims(|i, j| q((10 * i + j) as i64), 4, 3);
        swap_rows(m.as_mut().submatrix(1, 1, 3, 2), 0, 2);

        fancy_assert!(m[(1, 1)] == q(31));
        fancy_assert!(m[(3, 2)] == q(12));
        fancy_assert!(m[(1, 0)] == q(10));
        fancy_assert!(m[(3, 0)] == q(30));
    }

    #[test]
    fn permutation_check() {
        fancy_assert!(is_permutation(&[]));
        fancy_assert!(is_permutation(&[2, 0, 1]));
        fancy_assert!(!is_permutation(&[0, 0, 1]));
        fancy_assert!(!is_permutation(&[0, 3, 1]));
    }

    #[test]
    fn permute_and_invert() {
        let src = Mat::with_dims(|i, j| q((10 * i + j) as i64), 3, 2);
        let fwd = [2, 0, 1];
        let inv = [1, 2, 0];
        let perm = PermutationRef::new(&fwd, &inv);

        let mut dst = Mat::<BigRational>::zeros(3, 2);
        permute_rows(dst.as_mut(), src.as_ref(), perm);
        fancy_assert!(dst[(0, 1)] == q(21));
        fancy_assert!(dst[(1, 0)] == q(0));
        fancy_assert!(dst[(2, 1)] == q(11));

        let mut back = Mat::<BigRational>::zeros(3, 2);
        permute_rows(back.as_mut(), dst.as_ref(), perm.inverse());
        fancy_assert!(back == src);
    }
}
