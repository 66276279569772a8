// src/config.rs

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::boundary::BoundaryCondition;
use crate::error::{SolverError, SolverResult};
use crate::linear_solve::Relaxation;
use crate::params::FluidParams;

pub const DEFAULT_N: usize = 150;

/// Everything needed to construct a [`crate::solver::FluidSolver`].
///
/// Serialised as `config.json`; missing keys fall back to [`Default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Interior cells per axis.
    pub n: usize,
    pub boundary: BoundaryCondition,
    pub params: FluidParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            boundary: BoundaryCondition::Dirichlet,
            params: FluidParams::default(),
        }
    }
}

impl SimConfig {
    /// Defaults overridden by environment variables:
    ///
    ///   FLUID_N, FLUID_DT, FLUID_DIFF, FLUID_DIFFUSE_ITERS, FLUID_PRESSURE_ITERS,
    ///   FLUID_RELAXATION=gs|rb, FLUID_BOUNDARY=dirichlet|neumann|periodic
    ///
    /// Values that do not parse are ignored (logged at warn).
    pub fn from_env() -> Self {
        fn get<T: std::str::FromStr>(name: &str) -> Option<T> {
            let raw = std::env::var(name).ok()?;
            match raw.trim().parse::<T>() {
                Ok(v) => Some(v),
                Err(_) => {
                    log::warn!("ignoring {name}={raw:?}: could not parse");
                    None
                }
            }
        }

        let mut cfg = Self::default();

        if let Some(v) = get::<usize>("FLUID_N") {
            cfg.n = v;
        }
        if let Some(v) = get::<f32>("FLUID_DT") {
            cfg.params.dt = v;
        }
        if let Some(v) = get::<f32>("FLUID_DIFF") {
            cfg.params.diff = v;
        }
        if let Some(v) = get::<usize>("FLUID_DIFFUSE_ITERS") {
            cfg.params.diffuse_iters = v;
        }
        if let Some(v) = get::<usize>("FLUID_PRESSURE_ITERS") {
            cfg.params.pressure_iters = v;
        }
        if let Ok(v) = std::env::var("FLUID_RELAXATION") {
            match Relaxation::from_str(&v) {
                Some(r) => cfg.params.relaxation = r,
                None => log::warn!("ignoring FLUID_RELAXATION={v:?}: expected gs or rb"),
            }
        }
        if let Ok(v) = std::env::var("FLUID_BOUNDARY") {
            match BoundaryCondition::from_str(&v) {
                Some(b) => cfg.boundary = b,
                None => log::warn!("ignoring FLUID_BOUNDARY={v:?}"),
            }
        }

        cfg
    }

    pub fn from_json_file(path: &Path) -> SolverResult<Self> {
        let file = File::open(path)?;
        let cfg: Self = serde_json::from_reader(BufReader::new(file))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn write_to_dir(&self, out_dir: &Path) -> SolverResult<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Reject values the solver cannot run with.
    pub fn validate(&self) -> SolverResult<()> {
        if self.n == 0 {
            return Err(SolverError::InvalidDimension { n: self.n });
        }
        let p = &self.params;
        if !p.dt.is_finite() || p.dt <= 0.0 {
            return Err(SolverError::config(format!("dt must be positive, got {}", p.dt)));
        }
        if !p.diff.is_finite() || p.diff < 0.0 {
            return Err(SolverError::config(format!(
                "diff must be non-negative, got {}",
                p.diff
            )));
        }
        Ok(())
    }
}
