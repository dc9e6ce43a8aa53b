/// The closed set of outer-solver status codes.
///
/// The integer encoding is part of the wire contract with external callers
/// (MEX bindings, CLI exit codes) and must be preserved exactly.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Solved = 1,
    SolvedInaccurate = 2,
    /// Never returned by a kernel; used by callers as a placeholder before a solve starts.
    Unfinished = 0,
    Unbounded = -1,
    Infeasible = -2,
    Indeterminate = -3,
    Failed = -4,
    SigInt = -5,
    UnboundedInaccurate = -6,
    InfeasibleInaccurate = -7,
}

impl StatusCode {
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Status returned by the least-squares kernels (CGLS/QRLS/SVDLS), a narrower
/// vocabulary than [`StatusCode`]: 0 on success, 1 when an iteration cap was hit.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsStatus {
    Converged = 0,
    IterationLimitReached = 1,
}

impl LsStatus {
    pub const fn code(self) -> i32 {
        self as i32
    }
}
