// src/error.rs

use thiserror::Error;

use crate::boundary::BoundaryCondition;

pub type SolverResult<T> = Result<T, SolverError>;

/// Errors surfaced by the grid and the solver.
///
/// All of these are local, synchronous checks. None of them leave the
/// buffers half-written: the offending call returns before mutating anything.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Grid dimension must be at least one interior cell per axis.
    #[error("invalid grid dimension N = {n} (need N >= 1)")]
    InvalidDimension { n: usize },

    /// Field tag that does not name density, u- or v-velocity.
    #[error("unknown field '{0}' (expected density, u or v)")]
    UnknownField(String),

    /// Cell outside the interior `1..=N` on either axis.
    #[error("cell ({i}, {j}) is outside the interior 1..={n}")]
    OutOfBounds { i: usize, j: usize, n: usize },

    /// Boundary mode that has no fixup implemented.
    #[error("boundary condition {0:?} is not implemented")]
    UnsupportedBoundary(BoundaryCondition),

    #[error("config error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SolverError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SolverError {
    fn from(e: serde_json::Error) -> Self {
        Self::config(e.to_string())
    }
}
