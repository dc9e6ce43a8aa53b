//! Dense numerical kernels underlying the SuperSCS accelerated splitting-cone
//! solver: BLAS-like vector primitives, a cache-blocked GEMM, the CGLS / QRLS
//! / SVDLS least-squares engines, and the affine-subspace projection step of
//! the SuperSCS iteration.
//!
//! # Layers
//!
//! - [`blas`] — L0 vector primitives (`scale`, `axpy2`, `inner_prod`, the
//!   various norms) and L1 GEMM ([`blas::gemm`]).
//! - [`leastsquares`] — L2 solvers built on top of `blas`: [`leastsquares::cgls`]
//!   composes matrix-vector products from `blas::gemm`; [`leastsquares::qrls`]
//!   and [`leastsquares::svdls`] delegate their factorizations to `nalgebra`.
//! - [`proj`] — L3, the six-step affine projection used by the accelerated
//!   (SuperSCS) iteration, composed entirely from `blas` primitives.
//!
//! This crate does not implement the outer ADMM/SuperSCS iteration, the cone
//! projections, or problem scaling/normalization: it is the dense linear
//! algebra substrate an outer solver loop is built on top of. [`config`]
//! still carries the full configuration record for that outer loop, since
//! several kernels here are directly parameterized by it (`rho_x` feeds
//! [`proj::proj_lin_sys`]; `cg_rate`/`eps` shape the tolerance a caller would
//! pass to [`leastsquares::cgls`]).

pub mod blas;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod leastsquares;
pub mod proj;
pub mod status;
pub mod version;

pub use error::KernelError;
pub use status::{LsStatus, StatusCode};
