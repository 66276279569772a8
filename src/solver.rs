// src/solver.rs
//
// Stable-fluids time step on a fixed (N+2)² grid.
//
//   step()          = step_velocity(); step_density()
//   step_velocity() = swap u,v; diffuse u,v; project; swap u,v; advect u,v; project
//   step_density()  = swap d; diffuse d; swap d; advect d
//
// Diffusion and pressure are implicit solves relaxed a fixed number of sweeps
// (see `linear_solve`). Advection is a semi-Lagrangian backtrace with the source
// point clamped into [0.5, N+0.5]², so it always samples inside the lattice and
// needs no CFL restriction on dt.

use crate::boundary::{BoundaryCondition, apply_boundary};
use crate::config::SimConfig;
use crate::diagnostics;
use crate::error::{SolverError, SolverResult};
use crate::field::Field;
use crate::grid::{Carrier, Grid};
use crate::linear_solve::{Stencil, lin_solve};
use crate::params::FluidParams;

/// Boundary policy applied inside the step pipeline.
///
/// Unimplemented modes leave buffers as they are. The first occurrence is
/// logged at warn, later ones at trace.
#[derive(Debug, Clone)]
struct BoundaryPolicy {
    bc: BoundaryCondition,
    n: usize,
    reported: bool,
}

impl BoundaryPolicy {
    fn apply(&mut self, x: &mut [f32]) {
        if let Err(e) = apply_boundary(self.bc, self.n, x) {
            if self.reported {
                log::trace!("{e}");
            } else {
                log::warn!("{e}; boundary cells are left unchanged");
                self.reported = true;
            }
        }
    }
}

pub struct FluidSolver {
    grid: Grid,
    params: FluidParams,
    policy: BoundaryPolicy,
    // projection scratch, (N+2)² each, ring kept at the boundary policy
    pressure: Vec<f32>,
    divergence: Vec<f32>,
    // red-black staging buffer
    relax_tmp: Vec<f32>,
    steps: u64,
}

impl FluidSolver {
    /// Solver with `n` interior cells per axis and the default parameters
    /// (dt = 0.8, diff = 0.0001, 20 sweeps per solve).
    pub fn new(n: usize, bc: BoundaryCondition) -> SolverResult<Self> {
        Self::with_params(n, bc, FluidParams::default())
    }

    pub fn with_params(n: usize, bc: BoundaryCondition, params: FluidParams) -> SolverResult<Self> {
        let grid = Grid::new(n)?;
        let size = grid.size();
        log::info!(
            "FluidSolver: N = {}, {} cells, boundary = {}, dt = {}, diff = {}, relaxation = {}",
            n,
            size,
            bc.as_str(),
            params.dt,
            params.diff,
            params.relaxation.as_str()
        );

        Ok(Self {
            grid,
            params,
            policy: BoundaryPolicy {
                bc,
                n,
                reported: false,
            },
            pressure: vec![0.0; size],
            divergence: vec![0.0; size],
            relax_tmp: vec![0.0; size],
            steps: 0,
        })
    }

    pub fn from_config(cfg: &SimConfig) -> SolverResult<Self> {
        cfg.validate()?;
        Self::with_params(cfg.n, cfg.boundary, cfg.params)
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.grid.n()
    }

    pub fn boundary(&self) -> BoundaryCondition {
        self.policy.bc
    }

    pub fn params(&self) -> &FluidParams {
        &self.params
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of completed `step()` calls.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Current density, valid until the next mutating call.
    pub fn density(&self) -> &[f32] {
        self.grid.density()
    }

    pub fn velocity_u(&self) -> &[f32] {
        self.grid.velocity_u()
    }

    pub fn velocity_v(&self) -> &[f32] {
        self.grid.velocity_v()
    }

    /// Add `amount * dt` to the current buffer of `field` at interior cell (i, j).
    ///
    /// Cells outside `1..=N` return `OutOfBounds` and nothing is written.
    pub fn add_input_to_field(
        &mut self,
        field: Field,
        i: usize,
        j: usize,
        amount: f32,
    ) -> SolverResult<()> {
        let id = match self.grid.checked_idx(i, j) {
            Some(id) if self.grid.is_interior(i, j) => id,
            _ => {
                return Err(SolverError::OutOfBounds {
                    i,
                    j,
                    n: self.grid.n(),
                });
            }
        };
        self.grid.field_mut(field)[id] += amount * self.params.dt;
        Ok(())
    }

    /// Exchange current and previous storage of `field`.
    pub fn swap_buffers(&mut self, field: Field) {
        self.grid.swap_buffers(field);
    }

    /// Apply the configured boundary policy to the current buffer of `field`.
    ///
    /// Neumann and Periodic return `UnsupportedBoundary` and leave the buffer
    /// untouched.
    pub fn set_boundary(&mut self, field: Field) -> SolverResult<()> {
        let n = self.grid.n();
        apply_boundary(self.policy.bc, n, self.grid.field_mut(field))
    }

    /// Implicit diffusion of `field` from its previous buffer into its current
    /// buffer: `x = x0 + a ∇²x`, `a = dt * diff * N²`, `iters` sweeps.
    pub fn diffuse(&mut self, field: Field, iters: usize) {
        let n = self.grid.n();
        let a = self.params.diffusion_coupling(n);
        let relaxation = self.params.relaxation;

        let Self {
            grid,
            policy,
            relax_tmp,
            ..
        } = self;
        let (x, x0) = grid.buffers_mut(field).split_mut();
        lin_solve(
            n,
            x,
            x0,
            Stencil::diffusion(a),
            iters,
            relaxation,
            relax_tmp,
            |b| policy.apply(b),
        );
    }

    /// Semi-Lagrangian advection of `field` from its previous buffer into its
    /// current buffer, carried by the current velocity.
    pub fn advect(&mut self, field: Field) {
        let n = self.grid.n();
        let side = n + 2;
        let dt0 = self.params.dt * n as f32;
        let max = n as f32 + 0.5;

        let Self { grid, policy, .. } = self;
        let (d, d0, carrier) = grid.advect_views(field);

        for i in 1..=n {
            for j in 1..=n {
                let id = i + side * j;
                let (uij, vij) = match carrier {
                    Carrier::External { u, v } => (u[id], v[id]),
                    Carrier::SelfU { v } => (d[id], v[id]),
                    Carrier::SelfV { u } => (u[id], d[id]),
                };

                let x = (i as f32 - dt0 * uij).clamp(0.5, max);
                let y = (j as f32 - dt0 * vij).clamp(0.5, max);

                let i0 = x as usize;
                let j0 = y as usize;
                let i1 = i0 + 1;
                let j1 = j0 + 1;

                let s1 = x - i0 as f32;
                let s0 = 1.0 - s1;
                let t1 = y - j0 as f32;
                let t0 = 1.0 - t1;

                d[id] = s0 * (t0 * d0[i0 + side * j0] + t1 * d0[i0 + side * j1])
                    + s1 * (t0 * d0[i1 + side * j0] + t1 * d0[i1 + side * j1]);
            }
        }

        policy.apply(d);
    }

    /// Remove the divergent part of the current velocity (Helmholtz projection).
    ///
    /// Divergence and pressure live in dedicated scratch buffers, so the
    /// previous-velocity snapshots are never overwritten here.
    pub fn project(&mut self) {
        let n = self.grid.n();
        let side = n + 2;
        let h = 1.0 / n as f32;
        let iters = self.params.pressure_iters;
        let relaxation = self.params.relaxation;

        let Self {
            grid,
            policy,
            pressure: p,
            divergence: div,
            relax_tmp,
            ..
        } = self;
        let (u, v) = grid.velocity_mut();

        for i in 1..=n {
            for j in 1..=n {
                let id = i + side * j;
                div[id] = -0.5 * h * (u[id + 1] - u[id - 1] + v[id + side] - v[id - side]);
                p[id] = 0.0;
            }
        }
        policy.apply(div);
        policy.apply(p);

        lin_solve(
            n,
            p,
            div,
            Stencil::pressure(),
            iters,
            relaxation,
            relax_tmp,
            |b| policy.apply(b),
        );

        for i in 1..=n {
            for j in 1..=n {
                let id = i + side * j;
                u[id] -= 0.5 * (p[id + 1] - p[id - 1]) / h;
                v[id] -= 0.5 * (p[id + side] - p[id - side]) / h;
            }
        }
        policy.apply(u);
        policy.apply(v);
    }

    pub fn step_velocity(&mut self) {
        let iters = self.params.diffuse_iters;

        self.grid.swap_buffers(Field::VelocityU);
        self.grid.swap_buffers(Field::VelocityV);

        self.diffuse(Field::VelocityU, iters);
        self.diffuse(Field::VelocityV, iters);

        // keep the diffused field divergence-free before it is advected
        self.project();

        self.grid.swap_buffers(Field::VelocityU);
        self.grid.swap_buffers(Field::VelocityV);

        self.advect(Field::VelocityU);
        self.advect(Field::VelocityV);

        // interpolation in advect reintroduces divergence
        self.project();
    }

    pub fn step_density(&mut self) {
        self.grid.swap_buffers(Field::Density);
        self.diffuse(Field::Density, self.params.diffuse_iters);
        self.grid.swap_buffers(Field::Density);
        self.advect(Field::Density);
    }

    /// Advance by one `dt`: velocity first, then density carried by it.
    pub fn step(&mut self) {
        self.step_velocity();
        self.step_density();
        self.steps += 1;

        if log::log_enabled!(log::Level::Debug) {
            let n = self.n();
            log::debug!(
                "step {:6}: max|div| = {:.3e}, rms div = {:.3e}, total density = {:.6e}",
                self.steps,
                self.max_divergence(),
                diagnostics::rms_divergence(n, self.velocity_u(), self.velocity_v()),
                self.total_density()
            );
        }
    }

    /// Largest |∇·u| over the interior of the current velocity.
    pub fn max_divergence(&self) -> f32 {
        diagnostics::max_abs_divergence(self.n(), self.velocity_u(), self.velocity_v())
    }

    /// Sum of interior density.
    pub fn total_density(&self) -> f64 {
        diagnostics::total_interior(self.n(), self.density())
    }

    /// Zero every field and the scratch buffers; parameters are kept.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.pressure.fill(0.0);
        self.divergence.fill(0.0);
        self.relax_tmp.fill(0.0);
        self.steps = 0;
    }
}
