// src/grid.rs

use crate::error::{SolverError, SolverResult};
use crate::field::Field;

/// A current/previous pair of equal-length buffers for one field.
///
/// `swap` exchanges the two owned allocations; no cell data is copied.
#[derive(Debug, Clone)]
pub struct FieldBuffers {
    pub(crate) current: Vec<f32>,
    pub(crate) previous: Vec<f32>,
}

impl FieldBuffers {
    fn zeros(size: usize) -> Self {
        Self {
            current: vec![0.0; size],
            previous: vec![0.0; size],
        }
    }

    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
    }

    pub fn current(&self) -> &[f32] {
        &self.current
    }

    pub fn previous(&self) -> &[f32] {
        &self.previous
    }

    /// Mutable current buffer alongside the read-only snapshot.
    #[inline]
    pub(crate) fn split_mut(&mut self) -> (&mut [f32], &[f32]) {
        (self.current.as_mut_slice(), self.previous.as_slice())
    }

    fn fill(&mut self, value: f32) {
        self.current.fill(value);
        self.previous.fill(value);
    }
}

/// Velocity that carries a field during advection.
///
/// When a velocity component advects itself, that component is read from the
/// buffer being written. Each cell reads its own velocity before its own
/// write, so the value seen is always the pre-advection one.
#[derive(Clone, Copy)]
pub(crate) enum Carrier<'a> {
    External { u: &'a [f32], v: &'a [f32] },
    SelfU { v: &'a [f32] },
    SelfV { u: &'a [f32] },
}

/// Square (N+2)×(N+2) cell domain: N interior cells per axis plus a one-cell
/// boundary ring at index 0 and N+1.
///
/// Owns the six simulation buffers (density, u, v, each current + previous),
/// all zero-initialised at construction and never resized.
#[derive(Debug, Clone)]
pub struct Grid {
    n: usize,
    side: usize,
    density: FieldBuffers,
    u: FieldBuffers,
    v: FieldBuffers,
}

impl Grid {
    /// Allocate a grid with `n` interior cells per axis. Rejects `n == 0`.
    pub fn new(n: usize) -> SolverResult<Self> {
        if n == 0 {
            return Err(SolverError::InvalidDimension { n });
        }
        let side = n + 2;
        let size = side * side;
        log::debug!("allocating grid: N = {n}, {size} cells per buffer, 6 buffers");

        Ok(Self {
            n,
            side,
            density: FieldBuffers::zeros(size),
            u: FieldBuffers::zeros(size),
            v: FieldBuffers::zeros(size),
        })
    }

    /// Interior cells per axis.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Side length including the boundary ring (N+2).
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Length of every buffer, (N+2)².
    #[inline]
    pub fn size(&self) -> usize {
        self.side * self.side
    }

    /// Flat index of cell (i, j): `i + (N+2) * j`.
    ///
    /// Precondition: `0 <= i, j <= N+1`. Not checked in release builds; a
    /// violating index either aliases another cell or panics on slice access.
    /// Use [`Grid::checked_idx`] for untrusted coordinates.
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.side && j < self.side);
        i + self.side * j
    }

    pub fn checked_idx(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.side && j < self.side).then(|| i + self.side * j)
    }

    /// True for `1 <= i, j <= N`.
    #[inline]
    pub fn is_interior(&self, i: usize, j: usize) -> bool {
        (1..=self.n).contains(&i) && (1..=self.n).contains(&j)
    }

    /// Exchange the current and previous storage of `field`.
    pub fn swap_buffers(&mut self, field: Field) {
        self.buffers_mut(field).swap();
    }

    pub fn buffers(&self, field: Field) -> &FieldBuffers {
        match field {
            Field::Density => &self.density,
            Field::VelocityU => &self.u,
            Field::VelocityV => &self.v,
        }
    }

    pub(crate) fn buffers_mut(&mut self, field: Field) -> &mut FieldBuffers {
        match field {
            Field::Density => &mut self.density,
            Field::VelocityU => &mut self.u,
            Field::VelocityV => &mut self.v,
        }
    }

    /// Current buffer of `field`.
    pub fn field(&self, field: Field) -> &[f32] {
        self.buffers(field).current()
    }

    /// Previous (snapshot) buffer of `field`.
    pub fn field_prev(&self, field: Field) -> &[f32] {
        self.buffers(field).previous()
    }

    pub(crate) fn field_mut(&mut self, field: Field) -> &mut [f32] {
        self.buffers_mut(field).current.as_mut_slice()
    }

    pub fn density(&self) -> &[f32] {
        &self.density.current
    }

    pub fn velocity_u(&self) -> &[f32] {
        &self.u.current
    }

    pub fn velocity_v(&self) -> &[f32] {
        &self.v.current
    }

    pub fn density_prev(&self) -> &[f32] {
        &self.density.previous
    }

    pub fn velocity_u_prev(&self) -> &[f32] {
        &self.u.previous
    }

    pub fn velocity_v_prev(&self) -> &[f32] {
        &self.v.previous
    }

    /// Both current velocity components, mutably.
    pub(crate) fn velocity_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (self.u.current.as_mut_slice(), self.v.current.as_mut_slice())
    }

    /// Borrows needed to advect `field`: destination, snapshot, carrier velocity.
    pub(crate) fn advect_views(&mut self, field: Field) -> (&mut [f32], &[f32], Carrier<'_>) {
        match field {
            Field::Density => (
                self.density.current.as_mut_slice(),
                self.density.previous.as_slice(),
                Carrier::External {
                    u: self.u.current.as_slice(),
                    v: self.v.current.as_slice(),
                },
            ),
            Field::VelocityU => (
                self.u.current.as_mut_slice(),
                self.u.previous.as_slice(),
                Carrier::SelfU {
                    v: self.v.current.as_slice(),
                },
            ),
            Field::VelocityV => (
                self.v.current.as_mut_slice(),
                self.v.previous.as_slice(),
                Carrier::SelfV {
                    u: self.u.current.as_slice(),
                },
            ),
        }
    }

    /// Zero all six buffers, keeping the allocations.
    pub fn reset(&mut self) {
        self.density.fill(0.0);
        self.u.fill(0.0);
        self.v.fill(0.0);
    }
}
