// src/visualisation.rs
//
// Headless density snapshots. The whole (N+2)² buffer is drawn, ring included,
// with row j = 0 at the bottom of the image.

use plotters::prelude::*;
use std::path::Path;

/// Map a density value to a gray level. Values are clamped to [0, 1], so
/// anything >= 1 is white and anything <= 0 (or NaN) is black.
#[inline]
pub fn density_to_gray(value: f32) -> u8 {
    if !value.is_finite() {
        return if value == f32::INFINITY { 255 } else { 0 };
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Save `density` (length (N+2)²) as a grayscale PNG, `scale` pixels per cell.
pub fn save_density_png(
    n: usize,
    density: &[f32],
    path: &Path,
    scale: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let side = n + 2;
    if density.len() != side * side {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "density length mismatch: got {}, expected {} ((N+2)^2)",
                density.len(),
                side * side
            ),
        )));
    }
    let scale = scale.max(1);
    let px = side as u32 * scale;

    let root = BitMapBackend::new(path, (px, px)).into_drawing_area();
    root.fill(&BLACK)?;

    let s = scale as i32;
    let top = side as i32 - 1;
    for j in 0..side {
        for i in 0..side {
            let g = density_to_gray(density[i + side * j]);
            if g == 0 {
                continue;
            }
            let x0 = i as i32 * s;
            let y0 = (top - j as i32) * s;
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + s, y0 + s)],
                RGBColor(g, g, g).filled(),
            ))?;
        }
    }

    root.present()?;
    Ok(())
}
