//! Residual against hand-computed references

use approx::assert_relative_eq;
use ndarray::{Array4, Array5};
use tumorgen::data::{ParamBatch, PhysicalParams};
use tumorgen::physics::{diffusivity, laplacian, PhysicsResidual};

fn anatomy(shape: (usize, usize, usize, usize)) -> Array5<f32> {
    let (b, x, y, z) = shape;
    // white matter in the lower half, gray matter above
    Array5::from_shape_fn((b, x, y, z, 3), |(_, x, _, _, c)| {
        let tissue = if x < shape.1 / 2 { 0 } else { 1 };
        if c == tissue {
            1.0
        } else {
            0.0
        }
    })
}

#[test]
fn test_zero_diffusion_reduces_to_logistic_growth() {
    let shape = (1, 4, 4, 4);
    let u = Array4::from_shape_fn(shape, |(_, x, y, z)| 0.1 + 0.05 * (x + y + z) as f32);
    let adv = u.mapv(|v| v + 0.002);
    let dt = 0.01;
    let rho = 0.6;
    let params = ParamBatch::new(vec![PhysicalParams::new(0.0, rho, 0.5)]);

    let report = PhysicsResidual::new(dt, 10.0)
        .evaluate(&u, &adv, &anatomy(shape), &params)
        .unwrap();

    let expected = u
        .iter()
        .zip(adv.iter())
        .map(|(&u, &a)| {
            let r = (a - u) / dt - rho * u * (1.0 - u);
            r * r
        })
        .sum::<f32>()
        / u.len() as f32;
    assert_relative_eq!(report.loss, expected, max_relative = 1e-4);
    assert!(report.diffusion.iter().all(|&v| v == 0.0));
}

#[test]
fn test_gray_matter_diffuses_slower() {
    let shape = (1, 4, 2, 2);
    let params = ParamBatch::new(vec![PhysicalParams::new(0.5, 0.0, 0.5)]);
    let d = diffusivity(&anatomy(shape), &params, 10.0).unwrap();
    assert_relative_eq!(d[[0, 0, 0, 0]], 0.5);
    assert_relative_eq!(d[[0, 3, 0, 0]], 0.05);
}

#[test]
fn test_laplacian_of_interior_point() {
    let mut u = Array4::zeros((1, 3, 3, 3));
    u[[0, 1, 1, 1]] = 1.0;
    let lap = laplacian(&u);
    assert_relative_eq!(lap[[0, 1, 1, 1]], -6.0);
    assert_relative_eq!(lap[[0, 0, 1, 1]], 1.0);
    assert_relative_eq!(lap[[0, 0, 0, 0]], 0.0);
}
