//! 2D projections of 3D fields for visual inspection

use ndarray::{Array3, Array4, Axis};

/// Mean over z, as images `[B, Y, X]` with the y axis pointing up
pub fn xym(field: &Array4<f32>) -> Array3<f32> {
    let (batch, nx, ny, _) = field.dim();
    let mean = field
        .mean_axis(Axis(3))
        .unwrap_or_else(|| Array3::zeros((batch, nx, ny)));
    Array3::from_shape_fn((batch, ny, nx), |(b, row, col)| mean[[b, col, ny - 1 - row]])
}

/// Mean over x, as images `[B, Z, Y]` with the z axis pointing up
pub fn zym(field: &Array4<f32>) -> Array3<f32> {
    let (batch, _, ny, nz) = field.dim();
    let mean = field
        .mean_axis(Axis(1))
        .unwrap_or_else(|| Array3::zeros((batch, ny, nz)));
    Array3::from_shape_fn((batch, nz, ny), |(b, row, col)| mean[[b, col, nz - 1 - row]])
}

/// Both projections of a field
#[derive(Debug, Clone)]
pub struct Projections {
    pub xym: Array3<f32>,
    pub zym: Array3<f32>,
}

impl Projections {
    pub fn of(field: &Array4<f32>) -> Self {
        Self {
            xym: xym(field),
            zym: zym(field),
        }
    }
}
