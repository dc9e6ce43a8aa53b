use thiserror::Error;

/// Exceptional conditions surfaced at the crate boundary.
///
/// This is deliberately narrower than the per-kernel status-code contract
/// (see [`crate::status::StatusCode`] and [`crate::status::LsStatus`]):
/// iteration caps and CG numerical breakdown are documented, non-fatal
/// outcomes of a kernel call and are reported through those status codes,
/// not through this enum.
#[derive(Error, Debug)]
pub enum KernelError {
    #[error("invalid dimension: m={m}, n={n}")]
    InvalidDimension { m: i64, n: i64 },
    #[error("workspace too small: need {needed}, got {got}")]
    WorkspaceTooSmall { needed: usize, got: usize },
    #[error("workspace allocation failed for m={m}, n={n}")]
    AllocationFailed { m: i64, n: i64 },
    #[error("linear-algebra back-end unavailable")]
    BackendUnavailable,
    #[error("linear-algebra back-end reported status {info}")]
    BackendReported { info: i32 },
}
