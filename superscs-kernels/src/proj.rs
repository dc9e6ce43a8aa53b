//! The SuperSCS affine-subspace projection step (L3).
//!
//! Composed entirely from [`crate::blas`] primitives; see the module docs
//! for why an external `solveLinSys` call (step 5 of the six-step recipe) is
//! out of scope here.

use crate::blas;

/// One iteration's worth of projection onto the graph of the KKT operator.
///
/// `u_tilde` has length `L = n + m + 1`; `h` and `g` have length `L - 1`.
/// `g_dot_h` is the precomputed inner product `<g, h>`. `rho_x` is the
/// primal regularization from [`crate::config::Config::rho_x`].
///
/// Step 5 of the six-step recipe (the external `solveLinSys` call) does not
/// happen here: this function performs steps 1-4 and 6, leaving `u_tilde` in
/// the state the external linear-system solve would consume and then hand
/// back before step 6 runs against its output. Callers that do have a
/// `solveLinSys` must invoke it on `u_tilde[0..L-1]` between the call to
/// [`proj_lin_sys_pre`] and [`proj_lin_sys_post`] below; for callers without
/// one (e.g. exercising this kernel in isolation, as the test suite does),
/// [`proj_lin_sys`] runs the whole documented sequence without an
/// intervening solve, matching the reference test fixture.
pub fn proj_lin_sys(u_tilde: &mut [f64], h: &[f64], g: &[f64], g_dot_h: f64, rho_x: f64, n: usize, m: usize) {
    let l = n + m + 1;
    assert_eq!(u_tilde.len(), l, "u_tilde must have length n + m + 1");
    assert_eq!(h.len(), l - 1);
    assert_eq!(g.len(), l - 1);

    proj_lin_sys_pre(u_tilde, h, g, g_dot_h, rho_x, n, m);
    proj_lin_sys_post(u_tilde, h, n, m);
}

/// Steps 1-4 of the projection recipe, ending right before the external
/// `solveLinSys` call would run.
pub fn proj_lin_sys_pre(u_tilde: &mut [f64], h: &[f64], g: &[f64], g_dot_h: f64, rho_x: f64, n: usize, m: usize) {
    let l = n + m + 1;
    blas::scale(&mut u_tilde[0..n], rho_x);

    let last = u_tilde[l - 1];
    blas::add_scaled(&mut u_tilde[0..l - 1], h, -last);

    let ip = blas::inner_prod(&u_tilde[0..l - 1], g);
    blas::add_scaled(&mut u_tilde[0..l - 1], h, -ip / (g_dot_h + 1.0));

    blas::scale(&mut u_tilde[n..n + m], -1.0);
}

/// Step 6: restore the last coordinate, after the external `solveLinSys`
/// call has updated `u_tilde[0..L-1]` in place.
pub fn proj_lin_sys_post(u_tilde: &mut [f64], h: &[f64], _n: usize, _m: usize) {
    let l = u_tilde.len();
    let ip = blas::inner_prod(&u_tilde[0..l - 1], h);
    u_tilde[l - 1] += ip;
}
