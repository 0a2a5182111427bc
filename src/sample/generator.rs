//! Periodic qualitative sampling
//!
//! Every entry point returns the projections it persisted so the driver
//! can forward them to the summary sink.

use super::render::save_image;
use super::probe::ProbeSet;
use super::projection::Projections;
use crate::data::FieldBatch;
use crate::error::Result;
use crate::network::{Autoencoder, Generator};
use std::path::Path;

const PADDING: usize = 1;

fn persist(projections: &Projections, dir: &Path, prefix: &str, suffix: &str, nrow: usize) -> Result<()> {
    save_image(
        &projections.xym,
        dir.join(format!("{prefix}xym_{suffix}.png")),
        nrow,
        PADDING,
    )?;
    save_image(
        &projections.zym,
        dir.join(format!("{prefix}zym_{suffix}.png")),
        nrow,
        PADDING,
    )
}

/// Dump the ground-truth projections and probe metadata once, before training
pub fn write_ground_truth(probes: &ProbeSet, dir: &Path) -> Result<Projections> {
    let projections = Projections::of(&probes.ground_truth().field);
    persist(&projections, dir, "x_fixed_", "gt", probes.batch_size())?;
    probes.write_metadata(dir)?;
    tracing::info!(dir = %dir.display(), "wrote ground-truth samples");
    Ok(projections)
}

/// Run the generator on every probe against the ground-truth anatomy
///
/// Only the last probe (the ground-truth parameters) is written to disk.
pub fn generate(
    generator: &dyn Generator,
    probes: &ProbeSet,
    dir: &Path,
    step: u64,
) -> Result<Projections> {
    let anatomy = &probes.ground_truth().anatomy;
    let mut last = None;
    for params in probes.probes() {
        let field = generator.forward(&params.to_array(), anatomy)?;
        last = Some(Projections::of(&field));
    }
    let projections = match last {
        Some(p) => p,
        None => Projections::of(&probes.ground_truth().field),
    };
    persist(&projections, dir, "x_fixed_", &step.to_string(), probes.batch_size())?;
    tracing::debug!(step, probes = probes.probes().len(), "generated probe samples");
    Ok(projections)
}

/// Reconstruct `batch` with the autoencoder and write its projections
pub fn autoencode(
    autoencoder: &dyn Autoencoder,
    batch: &FieldBatch,
    dir: &Path,
    step: u64,
) -> Result<Projections> {
    let encoded = autoencoder.forward(&batch.field)?;
    let projections = Projections::of(&encoded.reconstruction);
    persist(&projections, dir, "", &step.to_string(), batch.size())?;
    tracing::debug!(step, "wrote autoencoder reconstructions");
    Ok(projections)
}
