//! Checkpoint structure for serialization

use crate::config::TrainingMode;
use crate::error::{Error, Result};
use crate::network::Parameter;
use chrono::{DateTime, Utc};
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Checkpoint file prefix; the global step is appended as `-<step>`
pub const CHECKPOINT_PREFIX: &str = "model.ckpt";

/// One flattened parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorRecord {
    pub name: String,
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl TensorRecord {
    pub fn from_parameter(param: &Parameter) -> Self {
        Self {
            name: param.name().to_string(),
            shape: param.shape().to_vec(),
            data: param.value().iter().copied().collect(),
        }
    }

    pub fn to_array(&self) -> Result<ArrayD<f32>> {
        ArrayD::from_shape_vec(IxDyn(&self.shape), self.data.clone()).map_err(|_| {
            Error::Serialization(format!(
                "tensor {} holds {} values for shape {:?}",
                self.name,
                self.data.len(),
                self.shape
            ))
        })
    }
}

/// Snapshot of every trainable parameter of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Global step the run stopped at
    pub step: u64,
    /// Learning rate at that step
    pub lr: f32,
    pub mode: TrainingMode,
    pub timestamp: DateTime<Utc>,
    /// Network name (`generator`, `discriminator`, `autoencoder`) to its parameters
    pub networks: BTreeMap<String, Vec<TensorRecord>>,
}

impl Checkpoint {
    pub fn capture(
        step: u64,
        lr: f32,
        mode: TrainingMode,
        networks: &[(&str, &[Parameter])],
    ) -> Self {
        let networks = networks
            .iter()
            .map(|(name, params)| {
                let records = params.iter().map(TensorRecord::from_parameter).collect();
                ((*name).to_string(), records)
            })
            .collect();
        Self {
            step,
            lr,
            mode,
            timestamp: Utc::now(),
            networks,
        }
    }

    /// `model.ckpt-<step>`
    pub fn file_name(step: u64) -> String {
        format!("{CHECKPOINT_PREFIX}-{step}")
    }

    pub fn parameter_count(&self) -> usize {
        self.networks
            .values()
            .flat_map(|records| records.iter().map(|r| r.data.len()))
            .sum()
    }

    /// Copy the stored values into live parameters, matched by name
    ///
    /// Every live parameter must be present with the same shape.
    pub fn restore(&self, networks: Vec<(&str, &mut [Parameter])>) -> Result<()> {
        for (network, params) in networks {
            let records = self.networks.get(network).ok_or_else(|| {
                Error::Serialization(format!("checkpoint has no network '{network}'"))
            })?;
            for param in params.iter_mut() {
                let record = records
                    .iter()
                    .find(|r| r.name == param.name())
                    .ok_or_else(|| {
                        Error::Serialization(format!(
                            "checkpoint has no parameter '{network}/{}'",
                            param.name()
                        ))
                    })?;
                if record.shape != param.shape() {
                    return Err(Error::shape("checkpoint parameter", param.shape(), &record.shape));
                }
                *param.value_mut() = record.to_array()?;
                param.zero_grad();
            }
        }
        Ok(())
    }
}
