//! Least-squares engines (L2): CGLS, QRLS, SVDLS.
//!
//! All three share the workspace-query convention described in the crate's
//! top-level docs: a dedicated `*_workspace_size` function tells the caller
//! how large a scratch buffer to bring, and the solver itself never
//! allocates.

pub mod cgls;
pub mod qrls;
pub mod svdls;

pub use cgls::{cgls, cgls_workspace_size};
pub use qrls::{qr_workspace_size, qrls};
pub use svdls::{svd_workspace_size, svdls};
