// src/params.rs

use serde::{Deserialize, Serialize};

use crate::linear_solve::Relaxation;

pub const DEFAULT_DT: f32 = 0.8;
pub const DEFAULT_DIFF: f32 = 0.0001;
pub const DEFAULT_ITERS: usize = 20;

/// Numerical parameters of the solver, fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidParams {
    pub dt: f32,              // time step
    pub diff: f32,            // diffusion coefficient (density and velocity)
    pub diffuse_iters: usize, // Gauss–Seidel sweeps per diffusion solve
    pub pressure_iters: usize,
    pub relaxation: Relaxation,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            diff: DEFAULT_DIFF,
            diffuse_iters: DEFAULT_ITERS,
            pressure_iters: DEFAULT_ITERS,
            relaxation: Relaxation::GaussSeidel,
        }
    }
}

impl FluidParams {
    /// Diffusion coupling `a = dt * diff * N²`.
    #[inline]
    pub fn diffusion_coupling(&self, n: usize) -> f32 {
        let nf = n as f32;
        self.dt * self.diff * nf * nf
    }
}
