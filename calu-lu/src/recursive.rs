//! Recursive blocked rank-revealing LU decomposition.
//!
//! The columns are split in two halves. The left half is factored first, its row permutation is
//! applied to the right half, and the right half is updated with a triangular solve and a Schur
//! complement. The trailing block of the Schur complement is then factored, and its row
//! permutation is applied back to the left half.
//!
//! When the left half does not have full column rank, the multipliers of the trailing block are
//! moved left so that the lower factor stays rank aligned.

use crate::{
    classical::{lu_classical_in_place, lu_classical_req},
    LuError, RecursiveLuParams,
};
use assert2::{assert as fancy_assert, debug_assert as fancy_debug_assert};
use calu_core::{
    mul::{matmul, Accum},
    solve::solve_unit_lower_triangular_in_place,
    sub::sub_in_place,
    ExactField, MatMut, MatRef,
};
use core::mem;
use dyn_stack::{DynStack, SizeOverflow, StackReq};
use reborrow::*;

/// Computes the size and alignment of required workspace for applying a row permutation to a
/// `num_rows×num_cols` block.
pub fn apply_permutation_req<T: 'static>(
    num_rows: usize,
    num_cols: usize,
) -> Result<StackReq, SizeOverflow> {
    let len = num_rows.checked_mul(num_cols).ok_or(SizeOverflow)?;
    StackReq::try_all_of([
        StackReq::try_new::<T>(len)?,
        StackReq::try_new::<usize>(num_rows)?,
    ])
}

/// Reorders the rows `row_offset..row_offset + num_rows` of `matrix`, restricted to the columns
/// `col_offset..col_offset + num_cols`, so that the row at local index `local_perm[i]` moves to
/// local index `i`. The same reordering is composed into `global_perm`:
/// `global_perm[row_offset + i]` becomes the previous `global_perm[row_offset + local_perm[i]]`.
///
/// Elements are moved, not cloned.
///
/// # Panics
///
/// Panics if the block is out of bounds, if `local_perm.len() < num_rows`, or if
/// `global_perm.len() < row_offset + num_rows`.
#[track_caller]
pub fn apply_permutation<T: ExactField>(
    global_perm: &mut [usize],
    matrix: MatMut<'_, T>,
    local_perm: &[usize],
    num_rows: usize,
    row_offset: usize,
    num_cols: usize,
    col_offset: usize,
    stack: DynStack<'_>,
) {
    if num_rows == 0 {
        return;
    }

    fancy_assert!(local_perm.len() >= num_rows);
    fancy_assert!(global_perm.len() >= row_offset + num_rows);

    let mut block = matrix.submatrix(row_offset, col_offset, num_rows, num_cols);
    let local_perm = &local_perm[..num_rows];
    let global_perm = &mut global_perm[row_offset..row_offset + num_rows];

    let (mut tmp, stack) = stack.make_with(num_rows * num_cols, |_| T::calu_zero());
    for (i, &p) in local_perm.iter().enumerate() {
        fancy_debug_assert!(p < num_rows);
        for j in 0..num_cols {
            tmp[i * num_cols + j] = mem::replace(&mut block[(p, j)], T::calu_zero());
        }
    }
    for i in 0..num_rows {
        for j in 0..num_cols {
            block[(i, j)] = mem::replace(&mut tmp[i * num_cols + j], T::calu_zero());
        }
    }

    let (tmp_perm, _) = stack.make_with(num_rows, |i| global_perm[local_perm[i]]);
    global_perm.copy_from_slice(&tmp_perm);
}

/// Computes the size and alignment of required workspace for performing a recursive LU
/// decomposition of an `m×n` matrix.
pub fn lu_recursive_req<T: 'static>(
    m: usize,
    n: usize,
    params: RecursiveLuParams,
) -> Result<StackReq, SizeOverflow> {
    if m.min(n) < params.recursion_threshold {
        return lu_classical_req::<T>(m, n);
    }

    let n1 = n / 2;
    let n2 = n - n1;
    let schur = m.checked_mul(n2).ok_or(SizeOverflow)?;

    StackReq::try_all_of([
        StackReq::try_new::<usize>(m)?,
        StackReq::try_any_of([
            lu_recursive_req::<T>(m, n1, params)?,
            apply_permutation_req::<T>(m, n2)?,
            StackReq::try_new::<T>(schur)?,
            lu_recursive_req::<T>(m, n2, params)?,
            apply_permutation_req::<T>(m, n1)?,
        ])?,
    ])
}

/// Copies `a` into `lu`, then computes its LU decomposition in place.
///
/// See [`lu_recursive_in_place`].
///
/// # Panics
///
/// Panics if `lu` and `a` don't have the same shape, if `perm.len() != a.nrows()`, or if
/// `params.recursion_threshold < 2`.
#[track_caller]
pub fn lu_recursive<T: ExactField>(
    lu: MatMut<'_, T>,
    a: MatRef<'_, T>,
    perm: &mut [usize],
    rank_check: bool,
    params: RecursiveLuParams,
    stack: DynStack<'_>,
) -> Result<usize, LuError> {
    fancy_assert!((lu.nrows(), lu.ncols()) == (a.nrows(), a.ncols()));
    lu_recursive_impl(lu, Some(a), perm, rank_check, params, stack)
}

/// Computes the rank-revealing LU decomposition of `lu` in place, and returns the rank.
///
/// On success, `perm` holds the row permutation: row `i` of the factored matrix is row
/// `perm[i]` of the input, and `lu` holds the rank aligned unit lower factor below the diagonal
/// and the upper factor on and above it. If `rank_check` is set, the decomposition fails with
/// [`LuError::RankDeficient`] as soon as the matrix is known not to have full rank, or as soon as
/// the left half of the columns of a recursively split block is found not to have full column
/// rank. The latter means that a matrix with `n / 2 > m` and `m >= params.recursion_threshold`
/// fails the check even when its rank is `m`. On failure, the contents of `lu` and `perm` are
/// unspecified.
///
/// The result is the same as the one computed by
/// [`lu_classical_in_place`](crate::classical::lu_classical_in_place).
///
/// # Panics
///
/// Panics if `perm.len() != lu.nrows()`, or if `params.recursion_threshold < 2`.
///
/// # Example
///
/// ```
/// use calu_core::mat;
/// use calu_lu::{
///     recursive::{lu_recursive_in_place, lu_recursive_req},
///     RecursiveLuParams,
/// };
/// use dyn_stack::{DynStack, GlobalMemBuffer};
/// use num_rational::Rational64;
///
/// let q = Rational64::from_integer;
/// let mut lu = mat![
///     [q(0), q(0), q(1), q(2)],
///     [q(1), q(2), q(0), q(0)],
///     [q(2), q(4), q(1), q(2)],
///     [q(0), q(0), q(3), q(6)],
/// ];
/// let mut perm = vec![0; 4];
///
/// let params = RecursiveLuParams::default();
/// let mut mem = GlobalMemBuffer::new(lu_recursive_req::<Rational64>(4, 4, params).unwrap());
/// let rank = lu_recursive_in_place(
///     lu.as_mut(),
///     &mut perm,
///     false,
///     params,
///     DynStack::new(&mut mem),
/// )
/// .unwrap();
///
/// assert_eq!(rank, 2);
/// ```
#[track_caller]
pub fn lu_recursive_in_place<T: ExactField>(
    lu: MatMut<'_, T>,
    perm: &mut [usize],
    rank_check: bool,
    params: RecursiveLuParams,
    stack: DynStack<'_>,
) -> Result<usize, LuError> {
    lu_recursive_impl(lu, None, perm, rank_check, params, stack)
}

#[track_caller]
fn lu_recursive_impl<T: ExactField>(
    lu: MatMut<'_, T>,
    a: Option<MatRef<'_, T>>,
    perm: &mut [usize],
    rank_check: bool,
    params: RecursiveLuParams,
    stack: DynStack<'_>,
) -> Result<usize, LuError> {
    let mut lu = lu;
    let mut stack = stack;
    let m = lu.nrows();
    let n = lu.ncols();

    fancy_assert!(perm.len() == m);
    fancy_assert!(params.recursion_threshold >= 2);

    if let Some(a) = a {
        lu.copy_from(a);
    }

    if m.min(n) < params.recursion_threshold {
        return lu_classical_in_place(lu, perm, rank_check);
    }

    log::trace!(target: "calu_lu", "recursive lu: {m}×{n}");

    let n1 = n / 2;
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let (mut local_perm, mut stack) = stack.rb_mut().make_with(m, |i| i);

    let r1 = lu_recursive_impl(
        lu.rb_mut().submatrix(0, 0, m, n1),
        None,
        &mut local_perm,
        rank_check,
        params,
        stack.rb_mut(),
    )?;

    if rank_check && r1 != n1 {
        log::debug!(
            target: "calu_lu",
            "rank check failed: left block {m}×{n1} has rank {r1}"
        );
        return Err(LuError::RankDeficient);
    }

    if r1 != 0 {
        apply_permutation(
            perm,
            lu.rb_mut(),
            &local_perm,
            m,
            0,
            n - n1,
            n1,
            stack.rb_mut(),
        );
    }

    {
        let (top, a01, bot, a11) = lu.rb_mut().split_at(r1, n1);
        let a00 = top.into_const().submatrix(0, 0, r1, r1);
        let a10 = bot.into_const().submatrix(0, 0, m - r1, r1);

        if r1 > 0 {
            let mut a01 = a01;
            solve_unit_lower_triangular_in_place(a00, a01.rb_mut());

            let (mut tmp, _) = stack
                .rb_mut()
                .make_with((m - r1) * (n - n1), |_| T::calu_zero());
            let mut tmp = MatMut::from_column_major_slice(&mut *tmp, m - r1, n - n1);
            matmul(tmp.rb_mut(), Accum::Replace, a10, a01.into_const());
            sub_in_place(a11, tmp.into_const());
        }
    }

    let r2 = lu_recursive_impl(
        lu.rb_mut().submatrix(r1, n1, m - r1, n - n1),
        None,
        &mut local_perm[..m - r1],
        rank_check,
        params,
        stack.rb_mut(),
    )?;

    if rank_check && r1 + r2 < m.min(n) {
        log::debug!(
            target: "calu_lu",
            "rank check failed: {m}×{n} block has rank {}",
            r1 + r2
        );
        return Err(LuError::RankDeficient);
    }

    apply_permutation(
        perm,
        lu.rb_mut(),
        &local_perm[..m - r1],
        m - r1,
        r1,
        n1,
        0,
        stack.rb_mut(),
    );

    if r1 != n1 {
        log::debug!(
            target: "calu_lu",
            "compressing {m}×{n} block: left rank {r1}, trailing rank {r2}"
        );
        for i in 0..m - r1 {
            for j in 0..i.min(r2) {
                let v = mem::replace(&mut lu[(r1 + i, n1 + j)], T::calu_zero());
                lu[(r1 + i, r1 + j)] = v;
            }
        }
    }

    Ok(r1 + r2)
}
