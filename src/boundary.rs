// src/boundary.rs

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// Outer boundary treatment of the (N+2)² domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    /// Every ring cell (edges and corners) pinned to 0: absorbing walls.
    #[default]
    Dirichlet,
    /// Zero-gradient walls. Declared, not implemented.
    Neumann,
    /// Wrap-around domain. Declared, not implemented.
    Periodic,
}

impl BoundaryCondition {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dirichlet" | "zero" | "fixed" => Some(Self::Dirichlet),
            "neumann" | "zero_gradient" => Some(Self::Neumann),
            "periodic" | "wrap" => Some(Self::Periodic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dirichlet => "dirichlet",
            Self::Neumann => "neumann",
            Self::Periodic => "periodic",
        }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self, Self::Dirichlet)
    }
}

#[inline]
fn ix(i: usize, j: usize, n: usize) -> usize {
    i + (n + 2) * j
}

/// Zero the full boundary ring of `x`, leaving the interior untouched.
pub fn zero_ring(x: &mut [f32], n: usize) {
    debug_assert_eq!(x.len(), (n + 2) * (n + 2));
    for k in 1..=n {
        x[ix(0, k, n)] = 0.0; // left
        x[ix(n + 1, k, n)] = 0.0; // right
        x[ix(k, 0, n)] = 0.0; // bottom
        x[ix(k, n + 1, n)] = 0.0; // top
    }
    x[ix(0, 0, n)] = 0.0;
    x[ix(0, n + 1, n)] = 0.0;
    x[ix(n + 1, 0, n)] = 0.0;
    x[ix(n + 1, n + 1, n)] = 0.0;
}

/// Apply boundary policy `bc` to `x` (length (N+2)²).
///
/// Neumann and Periodic have no fixup: the buffer is left exactly as it was
/// and `UnsupportedBoundary` is returned.
pub fn apply_boundary(bc: BoundaryCondition, n: usize, x: &mut [f32]) -> SolverResult<()> {
    if !bc.is_implemented() {
        return Err(SolverError::UnsupportedBoundary(bc));
    }
    zero_ring(x, n);
    Ok(())
}
