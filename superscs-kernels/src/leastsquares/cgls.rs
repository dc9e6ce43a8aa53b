//! Conjugate-gradient least squares: `min ||Ax - b||^2` via CG on the normal
//! equations `A^T A x = A^T b`, without ever forming `A^T A`.

use crate::blas::gemm::{gemm_cp, gemm_tn_cp};
use crate::blas::{add_scaled, axpy2_in_place, norm, norm_sq};
use crate::error::KernelError;
use crate::status::LsStatus;

/// Required workspace length: `max(m, n) + m + 2*n`. Returns 0 if `m <= 0` or `n <= 0`.
pub fn cgls_workspace_size(m: i64, n: i64) -> usize {
    if m <= 0 || n <= 0 {
        return 0;
    }
    (m.max(n) + m + 2 * n) as usize
}

/// Solves `min ||Ax - b||^2` for `A` (`m x n`, column-packed, any shape) by
/// conjugate gradient on the normal equations.
///
/// `x` is the initial iterate on entry (commonly all zeros) and the solution
/// on exit. `maxiter` is the iteration cap on entry and the number of
/// iterations actually performed on exit. `work` must be at least
/// [`cgls_workspace_size`] long; on exit its first `n` entries hold the
/// final residual `A^T (b - Ax)`.
///
/// Returns [`LsStatus::Converged`] on convergence (including the
/// zero-right-hand-side and CG-breakdown edge cases, both of which are
/// treated as converged-to-best-achievable) or
/// [`LsStatus::IterationLimitReached`] if the cap was hit first.
///
/// Returns [`KernelError::WorkspaceTooSmall`] rather than panicking if `work`
/// is shorter than [`cgls_workspace_size`] reports; this is the one
/// caller-supplied condition the kernel is required to detect and refuse
/// rather than assert on.
pub fn cgls(
    m: usize,
    n: usize,
    a: &[f64],
    b: &[f64],
    x: &mut [f64],
    tol: f64,
    maxiter: &mut usize,
    work: &mut [f64],
) -> Result<LsStatus, KernelError> {
    let needed = cgls_workspace_size(m as i64, n as i64);
    if work.len() < needed {
        return Err(KernelError::WorkspaceTooSmall { needed, got: work.len() });
    }
    assert_eq!(a.len(), m * n);
    assert_eq!(b.len(), m);
    assert_eq!(x.len(), n);

    let (s, rest) = work.split_at_mut(n);
    let (r, rest) = rest.split_at_mut(m);
    let (p, q) = rest.split_at_mut(n);

    // r <- b - A x
    r.copy_from_slice(b);
    gemm_cp(m, 1, n, -1.0, a, 1.0, x, r);

    // s <- A^T r, p <- s
    gemm_tn_cp(n, 1, m, 1.0, a, 0.0, r, s);
    p.copy_from_slice(s);

    let b_norm = norm(b);
    let mut gamma = norm_sq(s);
    let cap = *maxiter;

    tracing::debug!(m, n, cap, "cgls starting");

    if gamma.sqrt() <= tol * (1.0 + b_norm) {
        *maxiter = 0;
        tracing::debug!("cgls converged before first iteration");
        return Ok(LsStatus::Converged);
    }

    for iter in 1..=cap {
        // q <- A p
        gemm_cp(m, 1, n, 1.0, a, 0.0, p, q);
        let delta = norm_sq(q);

        if delta == 0.0 {
            // A has no remaining direction reachable from the current Krylov
            // subspace: this is as good as CG can do, treat it as converged.
            *maxiter = iter - 1;
            tracing::warn!(iter, "cgls numerical breakdown, treating as converged");
            return Ok(LsStatus::Converged);
        }

        let mu = gamma / delta;
        add_scaled(x, p, mu);
        add_scaled(r, q, -mu);

        gemm_tn_cp(n, 1, m, 1.0, a, 0.0, r, s);
        let gamma_new = norm_sq(s);

        tracing::trace!(iter, residual = gamma_new.sqrt(), "cgls iteration");

        if gamma_new.sqrt() <= tol * (1.0 + b_norm) {
            *maxiter = iter;
            tracing::debug!(iter, "cgls converged");
            return Ok(LsStatus::Converged);
        }

        let beta_cg = gamma_new / gamma;
        // p <- s + beta_cg * p == beta_cg * p + s, with p aliasing the output.
        axpy2_in_place(p, s, beta_cg, 1.0);
        gamma = gamma_new;
    }

    *maxiter = cap;
    tracing::warn!(cap, "cgls hit iteration cap without converging");
    Ok(LsStatus::IterationLimitReached)
}
