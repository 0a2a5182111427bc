//! Finite-difference stencils on batched volumes `[B, X, Y, Z]`
//!
//! Unit grid spacing. Both operators are linear; [`jacobian_adjoint`] is the
//! exact transpose of [`jacobian`] and [`laplacian`] is self-adjoint, which
//! is what the loss backward passes rely on.

use ndarray::{Array4, Array5, Axis, Slice};

/// Forward differences along x, y and z, stacked on a trailing axis.
///
/// `out[b, x, y, z, 0] = u[b, x + 1, y, z] - u[b, x, y, z]`, and likewise for
/// y and z. The difference at the upper edge of each axis is zero.
pub fn jacobian(field: &Array4<f32>) -> Array5<f32> {
    let (b, nx, ny, nz) = field.dim();
    let mut out = Array5::zeros((b, nx, ny, nz, 3));
    for d in 0..3 {
        let axis = Axis(d + 1);
        let n = field.len_of(axis);
        if n < 2 {
            continue;
        }
        let hi = field.slice_axis(axis, Slice::from(1..));
        let lo = field.slice_axis(axis, Slice::from(..n - 1));
        let mut component = out.index_axis_mut(Axis(4), d);
        component
            .slice_axis_mut(axis, Slice::from(..n - 1))
            .assign(&(&hi - &lo));
    }
    out
}

/// Transpose of [`jacobian`]: maps a gradient w.r.t. the Jacobian back to
/// a gradient w.r.t. the field.
pub fn jacobian_adjoint(grad: &Array5<f32>) -> Array4<f32> {
    let (b, nx, ny, nz, _) = grad.dim();
    let mut out = Array4::zeros((b, nx, ny, nz));
    for d in 0..3 {
        let axis = Axis(d + 1);
        let n = out.len_of(axis);
        if n < 2 {
            continue;
        }
        let g = grad.index_axis(Axis(4), d);
        let g = g.slice_axis(axis, Slice::from(..n - 1));
        out.slice_axis_mut(axis, Slice::from(1..)).scaled_add(1.0, &g);
        out.slice_axis_mut(axis, Slice::from(..n - 1)).scaled_add(-1.0, &g);
    }
    out
}

/// 7-point Laplacian; voxels outside the volume count as zero.
pub fn laplacian(field: &Array4<f32>) -> Array4<f32> {
    let mut out = field * -6.0;
    for d in 0..3 {
        let axis = Axis(d + 1);
        let n = field.len_of(axis);
        if n < 2 {
            continue;
        }
        out.slice_axis_mut(axis, Slice::from(..n - 1))
            .scaled_add(1.0, &field.slice_axis(axis, Slice::from(1..)));
        out.slice_axis_mut(axis, Slice::from(1..))
            .scaled_add(1.0, &field.slice_axis(axis, Slice::from(..n - 1)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Zip;

    fn ramp(shape: (usize, usize, usize, usize)) -> Array4<f32> {
        Array4::from_shape_fn(shape, |(b, x, y, z)| {
            (b as f32) * 0.5 + (x as f32) * 1.0 + (y as f32) * 2.0 + (z as f32) * 3.0
        })
    }

    fn dot4(a: &Array4<f32>, b: &Array4<f32>) -> f32 {
        Zip::from(a).and(b).fold(0.0, |acc, &x, &y| acc + x * y)
    }

    fn dot5(a: &Array5<f32>, b: &Array5<f32>) -> f32 {
        Zip::from(a).and(b).fold(0.0, |acc, &x, &y| acc + x * y)
    }

    #[test]
    fn test_jacobian_of_linear_ramp() {
        let j = jacobian(&ramp((1, 4, 4, 4)));
        assert_eq!(j[[0, 0, 0, 0, 0]], 1.0);
        assert_eq!(j[[0, 1, 2, 1, 1]], 2.0);
        assert_eq!(j[[0, 2, 2, 2, 2]], 3.0);
        // upper edges
        assert_eq!(j[[0, 3, 0, 0, 0]], 0.0);
        assert_eq!(j[[0, 0, 3, 0, 1]], 0.0);
        assert_eq!(j[[0, 0, 0, 3, 2]], 0.0);
    }

    #[test]
    fn test_jacobian_adjoint_identity() {
        let u = Array4::from_shape_fn((2, 3, 4, 5), |(b, x, y, z)| {
            ((b * 31 + x * 7 + y * 3 + z) % 11) as f32 * 0.1
        });
        let g = Array5::from_shape_fn((2, 3, 4, 5, 3), |(b, x, y, z, c)| {
            ((b + x * 5 + y * 2 + z * 3 + c * 13) % 7) as f32 * 0.3 - 1.0
        });
        let lhs = dot5(&jacobian(&u), &g);
        let rhs = dot4(&u, &jacobian_adjoint(&g));
        assert_relative_eq!(lhs, rhs, epsilon = 1e-3);
    }

    #[test]
    fn test_laplacian_interior_of_quadratic() {
        // u = x^2 + y^2 + z^2 has Laplacian 6 in the interior
        let u = Array4::from_shape_fn((1, 5, 5, 5), |(_, x, y, z)| {
            (x * x + y * y + z * z) as f32
        });
        let l = laplacian(&u);
        assert_relative_eq!(l[[0, 2, 2, 2]], 6.0);
        assert_relative_eq!(l[[0, 1, 3, 2]], 6.0);
    }

    #[test]
    fn test_laplacian_zero_padding_at_corner() {
        let u = Array4::from_elem((1, 3, 3, 3), 1.0);
        let l = laplacian(&u);
        // corner has three in-volume neighbours
        assert_relative_eq!(l[[0, 0, 0, 0]], -3.0);
        assert_relative_eq!(l[[0, 1, 1, 1]], 0.0);
    }

    #[test]
    fn test_laplacian_self_adjoint() {
        let u = Array4::from_shape_fn((1, 4, 3, 5), |(_, x, y, z)| ((x * 3 + y + z * 2) % 5) as f32);
        let v = Array4::from_shape_fn((1, 4, 3, 5), |(_, x, y, z)| ((x + y * 4 + z) % 3) as f32 - 1.0);
        assert_relative_eq!(dot4(&laplacian(&u), &v), dot4(&u, &laplacian(&v)), epsilon = 1e-3);
    }
}
