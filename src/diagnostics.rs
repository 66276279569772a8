// src/diagnostics.rs
//
// Read-only measurements on (N+2)² buffers. Used for logging and tests;
// nothing here feeds back into the step.

#[inline]
fn ix(i: usize, j: usize, n: usize) -> usize {
    i + (n + 2) * j
}

/// Central-difference divergence on the interior (ring cells are 0):
///
///   div = 0.5 * N * (u[i+1,j] - u[i-1,j] + v[i,j+1] - v[i,j-1])
pub fn divergence(n: usize, u: &[f32], v: &[f32]) -> Vec<f32> {
    let mut div = vec![0.0; (n + 2) * (n + 2)];
    let half_inv_h = 0.5 * n as f32;
    for j in 1..=n {
        for i in 1..=n {
            div[ix(i, j, n)] = half_inv_h
                * (u[ix(i + 1, j, n)] - u[ix(i - 1, j, n)] + v[ix(i, j + 1, n)]
                    - v[ix(i, j - 1, n)]);
        }
    }
    div
}

pub fn max_abs_divergence(n: usize, u: &[f32], v: &[f32]) -> f32 {
    divergence(n, u, v)
        .iter()
        .fold(0.0f32, |acc, d| acc.max(d.abs()))
}

/// Root-mean-square divergence over the N² interior cells.
pub fn rms_divergence(n: usize, u: &[f32], v: &[f32]) -> f32 {
    let div = divergence(n, u, v);
    let sum_sq: f64 = div.iter().map(|&d| (d as f64) * (d as f64)).sum();
    (sum_sq / (n * n) as f64).sqrt() as f32
}

/// Sum of the interior cells (ring excluded), accumulated in f64.
pub fn total_interior(n: usize, x: &[f32]) -> f64 {
    let mut s = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            s += x[ix(i, j, n)] as f64;
        }
    }
    s
}

/// (min, max) over the interior cells.
pub fn min_max_interior(n: usize, x: &[f32]) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for j in 1..=n {
        for i in 1..=n {
            let v = x[ix(i, j, n)];
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    (lo, hi)
}
