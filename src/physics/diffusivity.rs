//! Spatially varying diffusivity from tissue channels

use crate::data::ParamBatch;
use crate::error::{Error, Result};
use ndarray::{Array4, Array5, Axis};

/// Tissue channel holding white matter
pub const WHITE_MATTER: usize = 0;
/// Tissue channel holding gray matter
pub const GRAY_MATTER: usize = 1;

/// `D = D_w * (wm + gm / gray_matter_ratio)` per voxel.
///
/// CSF and background do not diffuse.
pub fn diffusivity(
    anatomy: &Array5<f32>,
    params: &ParamBatch,
    gray_matter_ratio: f32,
) -> Result<Array4<f32>> {
    let channels = anatomy.len_of(Axis(4));
    if channels <= GRAY_MATTER {
        return Err(Error::shape(
            "anatomy channels",
            &[GRAY_MATTER + 1],
            &[channels],
        ));
    }
    let batch = anatomy.len_of(Axis(0));
    if params.len() != batch {
        return Err(Error::shape("parameters", &[batch], &[params.len()]));
    }

    let wm = anatomy.index_axis(Axis(4), WHITE_MATTER);
    let gm = anatomy.index_axis(Axis(4), GRAY_MATTER);
    let mut d = &wm + &(&gm / gray_matter_ratio);
    for (mut sample, p) in d.outer_iter_mut().zip(params.iter()) {
        sample *= p.diffusion;
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PhysicalParams;
    use approx::assert_relative_eq;

    #[test]
    fn test_tissue_weighting() {
        let mut anatomy = Array5::zeros((1, 3, 1, 1, 3));
        anatomy[[0, 0, 0, 0, WHITE_MATTER]] = 1.0;
        anatomy[[0, 1, 0, 0, GRAY_MATTER]] = 1.0;
        anatomy[[0, 2, 0, 0, 2]] = 1.0;
        let params = ParamBatch::new(vec![PhysicalParams::new(0.5, 0.0, 0.0)]);

        let d = diffusivity(&anatomy, &params, 10.0).unwrap();
        assert_relative_eq!(d[[0, 0, 0, 0]], 0.5);
        assert_relative_eq!(d[[0, 1, 0, 0]], 0.05);
        assert_relative_eq!(d[[0, 2, 0, 0]], 0.0);
    }

    #[test]
    fn test_per_sample_coefficient() {
        let anatomy =
            Array5::from_shape_fn((2, 2, 2, 2, 3), |(.., c)| if c == 0 { 1.0 } else { 0.0 });
        let params = ParamBatch::new(vec![
            PhysicalParams::new(1.0, 0.0, 0.0),
            PhysicalParams::new(3.0, 0.0, 0.0),
        ]);
        let d = diffusivity(&anatomy, &params, 10.0).unwrap();
        assert!(d.index_axis(Axis(0), 0).iter().all(|&v| v == 1.0));
        assert!(d.index_axis(Axis(0), 1).iter().all(|&v| v == 3.0));
    }

    #[test]
    fn test_requires_two_channels() {
        let anatomy = Array5::zeros((1, 2, 2, 2, 1));
        let params = ParamBatch::new(vec![PhysicalParams::default()]);
        assert!(matches!(
            diffusivity(&anatomy, &params, 10.0),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
