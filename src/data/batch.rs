//! Training batches

use super::params::{ParamBatch, PhysicalParams};
use crate::error::{Error, Result};
use ndarray::{stack, Array3, Array4, Array5, Axis};

/// Which part of the dataset a batch comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Validation,
}

/// One simulated tumor as stored on disk
#[derive(Debug, Clone)]
pub struct Sample {
    /// Dataset identifier (file stem, simulation id, ...)
    pub id: String,
    /// Concentration field `[X, Y, Z]`
    pub field: Array3<f32>,
    /// Parameters of the simulation
    pub params: PhysicalParams,
    /// Tissue channels `[X, Y, Z, C]`
    pub anatomy: Array4<f32>,
    /// Precomputed spatial gradient `[X, Y, Z, 3]`
    pub grad: Array4<f32>,
}

/// A minibatch of samples stacked along a leading batch axis
#[derive(Debug, Clone)]
pub struct FieldBatch {
    /// Target concentration `[B, X, Y, Z]`
    pub field: Array4<f32>,
    /// Named parameters, one per sample
    pub params: ParamBatch,
    /// Tissue channels `[B, X, Y, Z, C]`
    pub anatomy: Array5<f32>,
    /// Ground-truth spatial gradient `[B, X, Y, Z, 3]`
    pub grad: Array5<f32>,
    /// Dataset identifiers
    pub sample_ids: Vec<String>,
}

impl FieldBatch {
    /// Stack samples into a batch
    pub fn stack(samples: &[Sample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::DataSource("cannot stack an empty batch".into()));
        }
        let shape_err = |e: ndarray::ShapeError| {
            Error::DataSource(format!("samples disagree in shape: {e}"))
        };

        let fields: Vec<_> = samples.iter().map(|s| s.field.view()).collect();
        let anatomy: Vec<_> = samples.iter().map(|s| s.anatomy.view()).collect();
        let grads: Vec<_> = samples.iter().map(|s| s.grad.view()).collect();

        let batch = Self {
            field: stack(Axis(0), &fields).map_err(shape_err)?,
            params: samples.iter().map(|s| s.params).collect(),
            anatomy: stack(Axis(0), &anatomy).map_err(shape_err)?,
            grad: stack(Axis(0), &grads).map_err(shape_err)?,
            sample_ids: samples.iter().map(|s| s.id.clone()).collect(),
        };
        batch.check_shapes()?;
        Ok(batch)
    }

    /// Number of samples
    pub fn size(&self) -> usize {
        self.field.shape()[0]
    }

    /// Spatial resolution `[X, Y, Z]`
    pub fn volume_shape(&self) -> [usize; 3] {
        let s = self.field.shape();
        [s[1], s[2], s[3]]
    }

    /// Verify that every tensor agrees on batch size and resolution
    pub fn check_shapes(&self) -> Result<()> {
        let f = self.field.shape();
        let a = self.anatomy.shape();
        if a[..4] != f[..] {
            return Err(Error::shape("anatomy", &[f[0], f[1], f[2], f[3], a[4]], a));
        }
        let g = self.grad.shape();
        if g[..4] != f[..] || g[4] != 3 {
            return Err(Error::shape("gradient", &[f[0], f[1], f[2], f[3], 3], g));
        }
        if self.params.len() != f[0] {
            return Err(Error::shape("parameters", &[f[0]], &[self.params.len()]));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, n: usize, value: f32) -> Sample {
        Sample {
            id: id.to_string(),
            field: Array3::from_elem((n, n, n), value),
            params: PhysicalParams::new(value, value, value),
            anatomy: Array4::zeros((n, n, n, 3)),
            grad: Array4::zeros((n, n, n, 3)),
        }
    }

    #[test]
    fn test_stack_samples() {
        let batch = FieldBatch::stack(&[sample("a", 4, 0.1), sample("b", 4, 0.2)]).unwrap();
        assert_eq!(batch.size(), 2);
        assert_eq!(batch.volume_shape(), [4, 4, 4]);
        assert_eq!(batch.anatomy.shape(), &[2, 4, 4, 4, 3]);
        assert_eq!(batch.sample_ids, vec!["a", "b"]);
        assert_eq!(batch.params.as_slice()[1].diffusion, 0.2);
    }

    #[test]
    fn test_stack_empty_fails() {
        assert!(FieldBatch::stack(&[]).is_err());
    }

    #[test]
    fn test_stack_mismatched_resolution_fails() {
        let err = FieldBatch::stack(&[sample("a", 4, 0.1), sample("b", 5, 0.2)]).unwrap_err();
        assert!(matches!(err, Error::DataSource(_)));
    }

    #[test]
    fn test_check_shapes_catches_param_count() {
        let mut batch = FieldBatch::stack(&[sample("a", 3, 0.1)]).unwrap();
        batch.params = ParamBatch::default();
        assert!(matches!(
            batch.check_shapes(),
            Err(Error::ShapeMismatch { what: "parameters", .. })
        ));
    }
}
