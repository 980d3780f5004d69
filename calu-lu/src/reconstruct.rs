use assert2::assert as fancy_assert;
use calu_core::{
    mul::{matmul, Accum},
    permutation::{permute_rows, PermutationRef},
    ExactField, Mat, MatMut, MatRef,
};
use reborrow::*;

/// Returns the `m×rank` unit lower factor stored in `lu_factors`.
///
/// # Panics
///
/// Panics if `rank > min(m, n)`.
#[track_caller]
pub fn lower_factor<T: ExactField>(lu_factors: MatRef<'_, T>, rank: usize) -> Mat<T> {
    fancy_assert!(rank <= lu_factors.nrows().min(lu_factors.ncols()));
    Mat::with_dims(
        |i, j| {
            if i == j {
                T::calu_one()
            } else if j < i {
                lu_factors[(i, j)].clone()
            } else {
                T::calu_zero()
            }
        },
        lu_factors.nrows(),
        rank,
    )
}

/// Returns the `rank×n` upper factor stored in `lu_factors`.
///
/// # Panics
///
/// Panics if `rank > min(m, n)`.
#[track_caller]
pub fn upper_factor<T: ExactField>(lu_factors: MatRef<'_, T>, rank: usize) -> Mat<T> {
    fancy_assert!(rank <= lu_factors.nrows().min(lu_factors.ncols()));
    Mat::with_dims(
        |i, j| {
            if j >= i {
                lu_factors[(i, j)].clone()
            } else {
                T::calu_zero()
            }
        },
        rank,
        lu_factors.ncols(),
    )
}

#[track_caller]
fn reconstruct_impl<T: ExactField>(
    dst: MatMut<'_, T>,
    lu_factors: Option<MatRef<'_, T>>,
    rank: usize,
    row_perm: PermutationRef<'_>,
) {
    let lu_factors = match lu_factors {
        Some(lu_factors) => lu_factors,
        None => dst.rb(),
    };

    let l = lower_factor(lu_factors, rank);
    let u = upper_factor(lu_factors, rank);

    let mut lu = Mat::zeros(lu_factors.nrows(), lu_factors.ncols());
    matmul(lu.as_mut(), Accum::Replace, l.as_ref(), u.as_ref());

    permute_rows(dst, lu.as_ref(), row_perm.inverse());
}

/// Computes the reconstructed matrix $P^{-1} L U$, given its rank-revealing LU decomposition,
/// and stores the result in `dst`.
///
/// # Panics
///
/// - Panics if the row permutation doesn't have the same dimension as the number of rows of the
/// matrix.
/// - Panics if the destination shape doesn't match the shape of the matrix.
/// - Panics if `rank > min(m, n)`.
#[track_caller]
pub fn reconstruct<T: ExactField>(
    dst: MatMut<'_, T>,
    lu_factors: MatRef<'_, T>,
    rank: usize,
    row_perm: PermutationRef<'_>,
) {
    fancy_assert!((dst.nrows(), dst.ncols()) == (lu_factors.nrows(), lu_factors.ncols()));
    fancy_assert!(row_perm.len() == lu_factors.nrows());
    reconstruct_impl(dst, Some(lu_factors), rank, row_perm)
}

/// Computes the reconstructed matrix, given its rank-revealing LU decomposition, and stores the
/// result in `lu_factors`.
///
/// # Panics
///
/// - Panics if the row permutation doesn't have the same dimension as the number of rows of the
/// matrix.
/// - Panics if `rank > min(m, n)`.
#[track_caller]
pub fn reconstruct_in_place<T: ExactField>(
    lu_factors: MatMut<'_, T>,
    rank: usize,
    row_perm: PermutationRef<'_>,
) {
    fancy_assert!(row_perm.len() == lu_factors.nrows());
    reconstruct_impl(lu_factors, None, rank, row_perm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classical::lu_classical, testing::*};
    use calu_core::mat;

    #[test]
    fn factors_of_pivoted_2x2() {
        let a = int_mat(&[&[0, 1], &[2, 3]]);
        let mut lu = Mat::zeros(2, 2);
        let mut perm = vec![0; 2];
        let rank = lu_classical(lu.as_mut(), a.as_ref(), &mut perm, true).unwrap();

        fancy_assert!(rank == 2);
        fancy_assert!(perm == [1, 0]);
        fancy_assert!(lu == int_mat(&[&[2, 3], &[0, 1]]));

        let perm_inv = [1, 0];
        let mut dst = Mat::zeros(2, 2);
        reconstruct(
            dst.as_mut(),
            lu.as_ref(),
            rank,
            PermutationRef::new(&perm, &perm_inv),
        );
        fancy_assert!(dst == a);

        reconstruct_in_place(lu.as_mut(), rank, PermutationRef::new(&perm, &perm_inv));
        fancy_assert!(lu == a);
    }

    #[test]
    fn rank_aligned_factors() {
        // rank 1: the multipliers of the rows below the pivot live in column 0
        let lu = mat![[q(0), q(2), q(4)], [q(3), q(0), q(0)], [q(5), q(0), q(0)]];
        let l = lower_factor(lu.as_ref(), 1);
        let u = upper_factor(lu.as_ref(), 1);

        fancy_assert!(l == mat![[q(1)], [q(3)], [q(5)]]);
        fancy_assert!(u == mat![[q(0), q(2), q(4)]]);

        let perm = [0, 1, 2];
        let mut dst = Mat::zeros(3, 3);
        reconstruct(dst.as_mut(), lu.as_ref(), 1, PermutationRef::new(&perm, &perm));
        fancy_assert!(dst == int_mat(&[&[0, 2, 4], &[0, 6, 12], &[0, 10, 20]]));
    }
}
