//! Exact rank-revealing LU decomposition.
//!
//! The decomposition of an `m×n` matrix $A$ of rank $r$ is such that:
//! $$A = P^{-1} L U,$$
//! where $P$ is a row permutation, $L$ is an `m×r` unit lower trapezoidal matrix, and $U$ is an
//! `r×n` upper trapezoidal (echelon) matrix.
//!
//! Both factors are stored in a single matrix. The strictly lower part of $L$ is rank aligned:
//! row `i` stores its multipliers in columns `0..min(i, r)`. Row `k < r` stores $U$ in columns
//! `k..n`. Every other entry is zero.
//!
//! Pivots are chosen structurally: the first entry in a column whose zero test certifies it as
//! nonzero. A column with no certified pivot is skipped, unless the zero test could not decide
//! for one of its candidates, in which case the factorization fails with
//! [`LuError::UndecidableZeroTest`].

#![warn(rust_2018_idioms)]
#![allow(clippy::too_many_arguments)]

use assert2::assert as fancy_assert;
use calu_core::{permutation::PermutationRef, ExactField, Mat, MatRef};
use dyn_stack::{DynStack, GlobalMemBuffer, SizeOverflow};

pub mod classical;
pub mod reconstruct;
pub mod recursive;

#[cfg(test)]
pub(crate) mod testing;

/// Errors that can occur during the decomposition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LuError {
    /// The rank check was requested, and the matrix or the left half of a recursively split
    /// block does not have full rank.
    RankDeficient,
    /// No candidate pivot of a column was certified nonzero, and the zero test could not decide
    /// for at least one of them.
    UndecidableZeroTest,
    /// The scratch memory requirement overflowed.
    OutOfMemory,
}

impl core::fmt::Display for LuError {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for LuError {}

impl From<SizeOverflow> for LuError {
    #[inline]
    fn from(_: SizeOverflow) -> Self {
        Self::OutOfMemory
    }
}

/// Tuning parameters for the recursive decomposition.
#[derive(Copy, Clone, Debug)]
#[non_exhaustive]
pub struct RecursiveLuParams {
    /// Blocks whose smaller dimension is below this value are factored with the classical
    /// algorithm. Must be at least `2`.
    pub recursion_threshold: usize,
}

impl Default for RecursiveLuParams {
    #[inline]
    fn default() -> Self {
        Self {
            recursion_threshold: 4,
        }
    }
}

impl RecursiveLuParams {
    /// Returns the parameters with the given recursion threshold.
    #[inline]
    pub fn with_recursion_threshold(recursion_threshold: usize) -> Self {
        Self {
            recursion_threshold,
        }
    }
}

/// Owning result of a successful decomposition.
#[derive(Clone, Debug)]
pub struct LuFactors<T> {
    factors: Mat<T>,
    row_perm: Vec<usize>,
    row_perm_inv: Vec<usize>,
    rank: usize,
}

impl<T: ExactField> LuFactors<T> {
    /// Computes the decomposition of `a` with the default parameters.
    ///
    /// If `rank_check` is set, the decomposition fails with [`LuError::RankDeficient`] as soon as
    /// the matrix is known not to have full rank, or as soon as the left half of the columns of a
    /// recursively split block does not have full column rank. An `m×n` matrix with
    /// `n / 2 > m` and `m` at least the recursion threshold therefore always fails the check.
    #[inline]
    pub fn new(a: MatRef<'_, T>, rank_check: bool) -> Result<Self, LuError> {
        Self::with_params(a, rank_check, RecursiveLuParams::default())
    }

    /// Computes the decomposition of `a`.
    ///
    /// # Panics
    ///
    /// Panics if `params.recursion_threshold < 2`.
    #[track_caller]
    pub fn with_params(
        a: MatRef<'_, T>,
        rank_check: bool,
        params: RecursiveLuParams,
    ) -> Result<Self, LuError> {
        fancy_assert!(params.recursion_threshold >= 2);

        let m = a.nrows();
        let n = a.ncols();

        let mut factors = Mat::zeros(m, n);
        let mut row_perm = vec![0usize; m];

        let mut mem = GlobalMemBuffer::new(recursive::lu_recursive_req::<T>(m, n, params)?);
        let rank = recursive::lu_recursive(
            factors.as_mut(),
            a,
            &mut row_perm,
            rank_check,
            params,
            DynStack::new(&mut mem),
        )?;

        let mut row_perm_inv = vec![0usize; m];
        for (i, &p) in row_perm.iter().enumerate() {
            row_perm_inv[p] = i;
        }

        Ok(Self {
            factors,
            row_perm,
            row_perm_inv,
            rank,
        })
    }

    /// Returns the rank of the decomposed matrix.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the combined `L`/`U` storage.
    #[inline]
    pub fn factors(&self) -> MatRef<'_, T> {
        self.factors.as_ref()
    }

    /// Returns the row permutation `P`, such that row `i` of `L U` is row `P[i]` of `A`.
    #[inline]
    pub fn row_permutation(&self) -> PermutationRef<'_> {
        // SAFETY: `row_perm_inv` was computed as the inverse of `row_perm`, which the
        // decomposition leaves as a permutation.
        unsafe { PermutationRef::new_unchecked(&self.row_perm, &self.row_perm_inv) }
    }

    /// Returns the `m×r` unit lower factor.
    #[inline]
    pub fn lower(&self) -> Mat<T> {
        reconstruct::lower_factor(self.factors.as_ref(), self.rank)
    }

    /// Returns the `r×n` upper factor.
    #[inline]
    pub fn upper(&self) -> Mat<T> {
        reconstruct::upper_factor(self.factors.as_ref(), self.rank)
    }

    /// Returns $P^{-1} L U$, which equals the decomposed matrix.
    pub fn reconstruct(&self) -> Mat<T> {
        let mut dst = Mat::zeros(self.factors.nrows(), self.factors.ncols());
        reconstruct::reconstruct(
            dst.as_mut(),
            self.factors.as_ref(),
            self.rank,
            self.row_permutation(),
        );
        dst
    }
}
