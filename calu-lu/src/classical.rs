//! Classical rank-revealing LU decomposition, used for the base case of the recursive algorithm.

use crate::LuError;
use assert2::assert as fancy_assert;
use calu_core::{permutation::swap_rows, ExactField, MatMut, MatRef, ZeroCheck};
use core::ops::Range;
use dyn_stack::{SizeOverflow, StackReq};
use reborrow::*;

/// Computes the size and alignment of required workspace for performing a classical LU
/// decomposition of an `m×n` matrix.
#[inline]
pub fn lu_classical_req<T: 'static>(_m: usize, _n: usize) -> Result<StackReq, SizeOverflow> {
    Ok(StackReq::default())
}

/// Returns the index of the first row in `rows` whose entry in column `col` is certified nonzero.
///
/// Returns `Ok(None)` if every candidate is certified zero, and
/// [`LuError::UndecidableZeroTest`] if no candidate is certified nonzero but some candidate could
/// not be decided.
///
/// # Panics
///
/// Panics if `rows` or `col` is out of bounds.
#[track_caller]
pub fn find_pivot<T: ExactField>(
    matrix: MatRef<'_, T>,
    rows: Range<usize>,
    col: usize,
) -> Result<Option<usize>, LuError> {
    fancy_assert!(rows.end <= matrix.nrows());
    fancy_assert!(col < matrix.ncols());

    let mut undecided = false;
    for i in rows {
        match matrix[(i, col)].calu_is_zero() {
            ZeroCheck::NonZero => return Ok(Some(i)),
            ZeroCheck::Zero => (),
            ZeroCheck::Unknown => undecided = true,
        }
    }

    if undecided {
        Err(LuError::UndecidableZeroTest)
    } else {
        Ok(None)
    }
}

/// Copies `a` into `lu`, then computes its LU decomposition in place.
///
/// See [`lu_classical_in_place`].
///
/// # Panics
///
/// Panics if `lu` and `a` don't have the same shape, or if `perm.len() != a.nrows()`.
#[track_caller]
pub fn lu_classical<T: ExactField>(
    lu: MatMut<'_, T>,
    a: MatRef<'_, T>,
    perm: &mut [usize],
    rank_check: bool,
) -> Result<usize, LuError> {
    fancy_assert!((lu.nrows(), lu.ncols()) == (a.nrows(), a.ncols()));
    let mut lu = lu;
    lu.copy_from(a);
    lu_classical_in_place(lu, perm, rank_check)
}

/// Computes the rank-revealing LU decomposition of `lu` in place, and returns the rank.
///
/// On success, `perm` holds the row permutation: row `i` of the factored matrix is row
/// `perm[i]` of the input. If `rank_check` is set, the decomposition stops with
/// [`LuError::RankDeficient`] at the first column with no pivot. On failure, the contents of
/// `lu` and `perm` are unspecified.
///
/// # Panics
///
/// Panics if `perm.len() != lu.nrows()`.
#[track_caller]
pub fn lu_classical_in_place<T: ExactField>(
    lu: MatMut<'_, T>,
    perm: &mut [usize],
    rank_check: bool,
) -> Result<usize, LuError> {
    let mut lu = lu;
    let m = lu.nrows();
    let n = lu.ncols();
    fancy_assert!(perm.len() == m);

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    if m == 0 || n == 0 {
        return Ok(0);
    }

    let mut rank = 0;
    let mut row = 0;
    let mut col = 0;

    while row < m && col < n {
        let pivot = match find_pivot(lu.rb(), row..m, col)? {
            Some(pivot) => pivot,
            None => {
                if rank_check {
                    return Err(LuError::RankDeficient);
                }
                col += 1;
                continue;
            }
        };

        rank += 1;
        if pivot != row {
            swap_rows(lu.rb_mut(), row, pivot);
            perm.swap(row, pivot);
        }

        let d = lu[(row, col)].calu_inv();
        for j in row + 1..m {
            let e = lu[(j, col)].calu_mul(&d);
            for k in col + 1..n {
                let prod = e.calu_mul(&lu[(row, k)]);
                let x = &mut lu[(j, k)];
                *x = x.calu_sub(&prod);
            }
            lu[(j, col)] = T::calu_zero();
            lu[(j, rank - 1)] = e;
        }

        row += 1;
        col += 1;
    }

    Ok(rank)
}
