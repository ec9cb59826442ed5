use thiserror::Error;

/// Input-validation failures raised before the first Metropolis step.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IsingError {
    #[error("lattice side must be at least 1 with N² addressable, got {0}")]
    InvalidSize(i64),
    #[error("iteration count must be non-negative, got {0}")]
    InvalidIterationCount(i64),
    #[error("invalid parameter range: {0}")]
    InvalidParameterRange(String),
    #[error("lattice of side {side} needs {expected} spins, got {actual}")]
    SpinCountMismatch {
        side: usize,
        expected: usize,
        actual: usize,
    },
}

impl IsingError {
    pub(crate) fn range(message: impl Into<String>) -> Self {
        IsingError::InvalidParameterRange(message.into())
    }
}
