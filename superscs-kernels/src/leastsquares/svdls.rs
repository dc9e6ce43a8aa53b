//! SVD-based least squares with `rcond`-controlled effective-rank truncation,
//! delegating the factorization to `nalgebra`'s dense `SVD`.

use nalgebra::{DMatrix, DVector};

use crate::error::KernelError;
use crate::status::LsStatus;

/// `nalgebra::SVD` computes its scratch internally, so `work` below is only
/// length-checked and never read; mirrors the workspace query convention
/// used elsewhere with the size of the one buffer the reference back-end
/// needs: staging space for `min(m, n)` singular values plus the `max(m, n)`
/// right-hand-side / solution vector. That right-hand-side/solution vector
/// is `b` itself here, not `work` — see [`svdls`].
pub fn svd_workspace_size(m: i64, n: i64) -> usize {
    if m <= 0 || n <= 0 {
        return 0;
    }
    (m.min(n) + m.max(n)) as usize
}

/// Solves `min ||Ax - b||^2` for column-packed `A` (any shape) via the SVD
/// pseudo-inverse, truncating singular values below `rcond * sigma_max` to
/// zero, in place on `b`.
///
/// `b` must be `max(m, n)` long. On entry its first `m` entries hold the
/// right-hand side; on exit its first `n` entries hold the solution. Unlike
/// [`crate::leastsquares::qrls`], no residual tail is defined here even when
/// `m > n` and slots remain past index `n`: the leftover entries are left in
/// an unspecified state, matching the reference kernel's contract for this
/// solver, which documents only the solution in `b[0..n]`.
///
/// `a`'s leading `min(m, n)` rows (column-packed) are overwritten with the
/// right singular vectors (`V^T`, row-major), matching the reference
/// kernel's behaviour of reusing `A`'s storage for `V^T`; `singular_values_out`
/// (length `min(m, n)`) holds the singular values in descending order, and
/// `rank_out` the count of them exceeding `rcond * sigma_max` — the
/// effective rank used to build the pseudo-inverse.
///
/// `work` must be at least [`svd_workspace_size`] long. Always returns
/// [`LsStatus::Converged`]: `nalgebra`'s dense SVD does not itself report a
/// non-convergent/degenerate back-end status the way a LAPACK `dgelsd` info
/// code would, so there is no nonzero code to pass through here.
pub fn svdls(
    m: usize,
    n: usize,
    a: &mut [f64],
    b: &mut [f64],
    rcond: f64,
    singular_values_out: &mut [f64],
    rank_out: &mut usize,
    work: &mut [f64],
) -> Result<LsStatus, KernelError> {
    assert_eq!(a.len(), m * n);
    assert_eq!(b.len(), m.max(n));
    assert_eq!(singular_values_out.len(), m.min(n));
    let needed = svd_workspace_size(m as i64, n as i64);
    if work.len() < needed {
        return Err(KernelError::WorkspaceTooSmall { needed, got: work.len() });
    }

    let a_mat = DMatrix::from_column_slice(m, n, a);
    let b_vec = DVector::from_column_slice(&b[0..m]);

    let svd = a_mat.svd(true, true);
    let u = svd.u.expect("svd.u requested");
    let v_t = svd.v_t.expect("svd.v_t requested");
    let sigma = &svd.singular_values;

    let sigma_max = sigma.iter().cloned().fold(0.0_f64, f64::max);
    let threshold = rcond * sigma_max;

    let r = sigma.len();
    singular_values_out.copy_from_slice(sigma.as_slice());
    let rank = sigma.iter().filter(|&&s| s > threshold).count();
    *rank_out = rank;

    let utb = u.transpose() * &b_vec;

    let mut scaled = DVector::zeros(r);
    for i in 0..r {
        scaled[i] = if sigma[i] > threshold { utb[i] / sigma[i] } else { 0.0 };
    }

    let x_vec = v_t.transpose() * scaled;
    b[0..n].copy_from_slice(x_vec.as_slice());

    // Overwrite A's leading min(m, n) rows (column-packed) with V^T's rows.
    for i in 0..r {
        for j in 0..n {
            a[i + j * m] = v_t[(i, j)];
        }
    }

    tracing::debug!(m, n, rank, sigma_max, "svdls solved");

    Ok(LsStatus::Converged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_full_rank_matches_direct_solve() {
        let mut a = [2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0];
        let x_correct = [1.0, 2.0, 3.0];

        let mut b = [2.0, 6.0, 12.0];
        let mut sv = [0.0; 3];
        let mut rank = 0;
        let mut work = vec![0.0; svd_workspace_size(3, 3)];
        let status = svdls(3, 3, &mut a, &mut b, 1e-12, &mut sv, &mut rank, &mut work).unwrap();

        assert_eq!(status, LsStatus::Converged);
        assert_eq!(rank, 3);
        for (got, want) in b.iter().zip(&x_correct) {
            assert!((got - want).abs() < 1e-10, "{} vs {}", got, want);
        }
    }

    #[test]
    fn rank_deficient_matrix_truncates_to_minimum_norm_solution() {
        // Rank-1 2x2 matrix: second "direction" is numerically zero, so
        // a large rcond should zero it out and produce the minimum-norm
        // solution rather than blowing up on a near-zero singular value.
        let mut a = [1.0, 1.0, 1.0, 1.0 + 1e-14];

        let mut b = [2.0, 2.0];
        let mut sv = [0.0; 2];
        let mut rank = 0;
        let mut work = vec![0.0; svd_workspace_size(2, 2)];
        svdls(2, 2, &mut a, &mut b, 1e-8, &mut sv, &mut rank, &mut work).unwrap();

        assert_eq!(rank, 1);
        // Minimum-norm solution to x0 + x1 = 2 (roughly) is x0 = x1 = 1.
        assert!((b[0] - 1.0).abs() < 1e-6, "{:?}", b);
        assert!((b[1] - 1.0).abs() < 1e-6, "{:?}", b);
    }

    #[test]
    fn tall_matrix_residual_is_orthogonal_to_column_space() {
        let mut a = [1.0, 2.0, -1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 2.0, -1.0, 0.0, 1.0];
        let b_orig = [1.0, 0.0, 2.0, -1.0];

        let mut b = b_orig;
        let mut sv = [0.0; 3];
        let mut rank = 0;
        let mut work = vec![0.0; svd_workspace_size(4, 3)];
        let a_orig = a;
        svdls(4, 3, &mut a, &mut b, 1e-12, &mut sv, &mut rank, &mut work).unwrap();

        let a_mat = DMatrix::from_column_slice(4, 3, &a_orig);
        let x_vec = DVector::from_column_slice(&b[0..3]);
        let resid = &a_mat * &x_vec - DVector::from_column_slice(&b_orig);
        let at_resid = a_mat.transpose() * resid;
        for v in at_resid.iter() {
            assert!(v.abs() < 1e-8, "A^T residual component {}", v);
        }
    }

    #[test]
    fn increasing_rcond_never_increases_reported_rank() {
        // A 3x3 matrix with a clear separation between singular values,
        // so different rcond thresholds land on different ranks.
        let a_orig = [4.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1e-8];
        let b_orig = [1.0, 1.0, 1.0];

        let rconds = [1e-12, 1e-6, 1e-3, 1e-1, 0.5];
        let mut prev_rank = usize::MAX;
        for &rcond in &rconds {
            let mut a = a_orig;
            let mut b = b_orig;
            let mut sv = [0.0; 3];
            let mut rank = 0;
            let mut work = vec![0.0; svd_workspace_size(3, 3)];
            svdls(3, 3, &mut a, &mut b, rcond, &mut sv, &mut rank, &mut work).unwrap();
            assert!(rank <= prev_rank, "rank grew from {} to {} as rcond increased", prev_rank, rank);
            prev_rank = rank;
        }
    }

    #[test]
    fn undersized_workspace_is_reported_not_panicked() {
        let mut a = [2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0];
        let mut b = [2.0, 6.0, 12.0];
        let mut sv = [0.0; 3];
        let mut rank = 0;
        let needed = svd_workspace_size(3, 3);
        let mut work = vec![0.0; needed - 1];
        let err = svdls(3, 3, &mut a, &mut b, 1e-12, &mut sv, &mut rank, &mut work).unwrap_err();
        match err {
            KernelError::WorkspaceTooSmall { needed: n, got } => {
                assert_eq!(n, needed);
                assert_eq!(got, needed - 1);
            }
            other => panic!("expected WorkspaceTooSmall, got {other:?}"),
        }
    }
}
