//! Procedural dataset for smoke runs and tests
//!
//! Anatomy is a white-matter core inside a gray-matter shell inside CSF.
//! The tumor is a logistic front centred in the volume whose radius grows
//! like `sqrt(D_w * t) + rho * t`.

use super::batch::{Sample, Split};
use super::params::PhysicalParams;
use super::source::SampleStore;
use crate::error::{Error, Result};
use crate::physics::jacobian;
use ndarray::{Array3, Array4, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic in-memory [`SampleStore`]
#[derive(Debug, Clone)]
pub struct SyntheticStore {
    shape: [usize; 3],
    train_len: usize,
    val_len: usize,
    seed: u64,
}

impl SyntheticStore {
    pub fn new(shape: [usize; 3], train_len: usize, val_len: usize, seed: u64) -> Self {
        Self {
            shape,
            train_len,
            val_len,
            seed,
        }
    }

    fn params_for(&self, split: Split, index: usize) -> PhysicalParams {
        let salt = match split {
            Split::Train => 0x5eed,
            Split::Validation => 0x7a11,
        };
        let mut rng = StdRng::seed_from_u64(self.seed ^ salt ^ (index as u64).rotate_left(17));
        PhysicalParams::new(
            rng.random_range(0.0..1.0),
            rng.random_range(0.0..1.0),
            rng.random_range(0.1..1.0),
        )
    }

    fn anatomy(&self) -> Array4<f32> {
        let [nx, ny, nz] = self.shape;
        Array4::from_shape_fn((nx, ny, nz, 3), |(x, y, z, c)| {
            let r = normalized_radius(self.shape, x, y, z);
            let tissue = if r < 0.45 {
                0
            } else if r < 0.8 {
                1
            } else {
                2
            };
            if tissue == c {
                1.0
            } else {
                0.0
            }
        })
    }

    fn field(&self, p: &PhysicalParams) -> Array3<f32> {
        let [nx, ny, nz] = self.shape;
        let radius = (p.diffusion.max(0.0) * p.time.max(0.0)).sqrt() * 0.5
            + p.proliferation * p.time * 0.3;
        let width = 0.08;
        Array3::from_shape_fn((nx, ny, nz), |(x, y, z)| {
            let r = normalized_radius(self.shape, x, y, z);
            1.0 / (1.0 + ((r - radius) / width).exp())
        })
    }
}

fn normalized_radius(shape: [usize; 3], x: usize, y: usize, z: usize) -> f32 {
    let coord = |i: usize, n: usize| {
        let c = (n as f32 - 1.0) / 2.0;
        if c > 0.0 {
            (i as f32 - c) / c
        } else {
            0.0
        }
    };
    let (dx, dy, dz) = (coord(x, shape[0]), coord(y, shape[1]), coord(z, shape[2]));
    (dx * dx + dy * dy + dz * dz).sqrt()
}

impl SampleStore for SyntheticStore {
    fn len(&self, split: Split) -> usize {
        match split {
            Split::Train => self.train_len,
            Split::Validation => self.val_len,
        }
    }

    fn load(&self, split: Split, index: usize) -> Result<Sample> {
        if index >= self.len(split) {
            return Err(Error::DataSource(format!(
                "{split:?} index {index} out of range ({})",
                self.len(split)
            )));
        }
        let params = self.params_for(split, index);
        let field = self.field(&params);
        let grad = jacobian(&field.clone().insert_axis(Axis(0))).index_axis_move(Axis(0), 0);
        let prefix = match split {
            Split::Train => "train",
            Split::Validation => "val",
        };
        Ok(Sample {
            id: format!("{prefix}_{index:05}"),
            field,
            params,
            anatomy: self.anatomy(),
            grad,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_samples() {
        let store = SyntheticStore::new([5, 5, 5], 4, 2, 3);
        let a = store.load(Split::Train, 1).unwrap();
        let b = store.load(Split::Train, 1).unwrap();
        assert_eq!(a.params, b.params);
        assert_eq!(a.field, b.field);
        assert_eq!(a.id, "train_00001");
    }

    #[test]
    fn test_splits_differ() {
        let store = SyntheticStore::new([5, 5, 5], 4, 4, 3);
        let t = store.load(Split::Train, 0).unwrap();
        let v = store.load(Split::Validation, 0).unwrap();
        assert_ne!(t.params, v.params);
    }

    #[test]
    fn test_field_bounded_and_anatomy_one_hot() {
        let store = SyntheticStore::new([6, 6, 6], 1, 1, 0);
        let s = store.load(Split::Train, 0).unwrap();
        assert!(s.field.iter().all(|&v| (0.0..=1.0).contains(&v)));
        for voxel in s.anatomy.lanes(Axis(3)) {
            assert_eq!(voxel.sum(), 1.0);
        }
        assert_eq!(s.grad.shape(), &[6, 6, 6, 3]);
    }

    #[test]
    fn test_out_of_range_index() {
        let store = SyntheticStore::new([4, 4, 4], 2, 0, 0);
        assert!(store.load(Split::Train, 2).is_err());
        assert!(store.load(Split::Validation, 0).is_err());
    }
}
