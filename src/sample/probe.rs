//! Fixed probe inputs for periodic sampling

use crate::data::{FieldBatch, ParamBatch, PhysicalParams, PARAM_COUNT};
use crate::error::Result;
use ndarray::Array2;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Time values available to the time-sweep probe
const TIME_SPACE: [f32; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f32 / (n - 1) as f32)
            .collect(),
    }
}

/// One sweep probe: zeros except for component `column`
fn sweep(column: usize, batch_size: usize) -> Result<ParamBatch> {
    let values = if column == 2 {
        if batch_size <= TIME_SPACE.len() {
            TIME_SPACE[TIME_SPACE.len() - batch_size..].to_vec()
        } else {
            linspace(0.1, 1.0, batch_size)
        }
    } else {
        linspace(0.0, 1.0, batch_size)
    };
    let mut array = Array2::zeros((batch_size, PARAM_COUNT));
    for (row, v) in values.into_iter().enumerate() {
        array[[row, column]] = v;
    }
    ParamBatch::from_array(&array)
}

/// Probe parameter batches plus the ground-truth batch they are compared to
///
/// Built once at warm-up and never mutated.
#[derive(Debug, Clone)]
pub struct ProbeSet {
    probes: Vec<ParamBatch>,
    ground_truth: FieldBatch,
}

impl ProbeSet {
    /// One sweep per parameter component, then the ground truth's own parameters
    pub fn build(ground_truth: FieldBatch) -> Result<Self> {
        let batch_size = ground_truth.size();
        let mut probes = (0..PARAM_COUNT)
            .map(|column| sweep(column, batch_size))
            .collect::<Result<Vec<_>>>()?;
        probes.push(ground_truth.params.clone());
        Ok(Self {
            probes,
            ground_truth,
        })
    }

    pub fn probes(&self) -> &[ParamBatch] {
        &self.probes
    }

    pub fn ground_truth(&self) -> &FieldBatch {
        &self.ground_truth
    }

    pub fn batch_size(&self) -> usize {
        self.ground_truth.size()
    }

    /// Sample ids on the first line, then one parameter vector per line
    pub fn metadata(&self) -> String {
        let mut out = self.ground_truth.sample_ids.join(" ");
        out.push('\n');
        for PhysicalParams {
            diffusion,
            proliferation,
            time,
        } in self.ground_truth.params.iter()
        {
            let _ = writeln!(out, "{diffusion} {proliferation} {time}");
        }
        out
    }

    /// Write [`ProbeSet::metadata`] to `<dir>/x_fixed_gt.txt`
    pub fn write_metadata(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join("x_fixed_gt.txt"), self.metadata())?;
        Ok(())
    }
}
