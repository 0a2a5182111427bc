//! Named physical parameters
//!
//! Datasets store the parameters as positional vectors `[D_w, rho, t]`.
//! The conversion to and from that layout happens only here.

use crate::error::{Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Number of physical parameters per sample
pub const PARAM_COUNT: usize = 3;

/// Parameters of one simulated tumor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicalParams {
    /// Diffusion coefficient `D_w` (white matter)
    pub diffusion: f32,
    /// Proliferation rate `rho`
    pub proliferation: f32,
    /// Normalized simulation time
    pub time: f32,
}

impl PhysicalParams {
    pub fn new(diffusion: f32, proliferation: f32, time: f32) -> Self {
        Self {
            diffusion,
            proliferation,
            time,
        }
    }

    /// Positional layout used by the networks.
    pub fn to_vector(&self) -> [f32; PARAM_COUNT] {
        [self.diffusion, self.proliferation, self.time]
    }

    pub fn from_vector(v: [f32; PARAM_COUNT]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Same tumor observed `dt` later.
    pub fn advanced(&self, dt: f32) -> Self {
        Self {
            time: self.time + dt,
            ..*self
        }
    }
}

/// One parameter record per sample of a batch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamBatch(Vec<PhysicalParams>);

impl ParamBatch {
    pub fn new(params: Vec<PhysicalParams>) -> Self {
        Self(params)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicalParams> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PhysicalParams] {
        &self.0
    }

    /// Every sample moved forward in time by `dt`.
    pub fn advanced(&self, dt: f32) -> Self {
        Self(self.0.iter().map(|p| p.advanced(dt)).collect())
    }

    /// `[batch, 3]` matrix in `[D_w, rho, t]` order.
    pub fn to_array(&self) -> Array2<f32> {
        let mut out = Array2::zeros((self.0.len(), PARAM_COUNT));
        for (mut row, p) in out.rows_mut().into_iter().zip(&self.0) {
            for (dst, v) in row.iter_mut().zip(p.to_vector()) {
                *dst = v;
            }
        }
        out
    }

    /// Inverse of [`ParamBatch::to_array`].
    pub fn from_array(array: &Array2<f32>) -> Result<Self> {
        if array.ncols() != PARAM_COUNT {
            return Err(Error::shape(
                "parameter matrix",
                &[array.nrows(), PARAM_COUNT],
                array.shape(),
            ));
        }
        let params = array
            .rows()
            .into_iter()
            .map(|row| PhysicalParams::new(row[0], row[1], row[2]))
            .collect();
        Ok(Self(params))
    }
}

impl FromIterator<PhysicalParams> for ParamBatch {
    fn from_iter<I: IntoIterator<Item = PhysicalParams>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
