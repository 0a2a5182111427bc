//! Checkpoint saving

use super::checkpoint::Checkpoint;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write `checkpoint` as `<dir>/model.ckpt-<step>` and return the path
///
/// The file is written under a temporary name and renamed into place.
pub fn save_checkpoint(checkpoint: &Checkpoint, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let name = Checkpoint::file_name(checkpoint.step);
    let path = dir.join(&name);
    let tmp = dir.join(format!("{name}.tmp"));

    let mut writer = BufWriter::new(File::create(&tmp)?);
    serde_json::to_writer(&mut writer, checkpoint)?;
    writer.flush()?;
    drop(writer);
    fs::rename(&tmp, &path)?;

    tracing::info!(
        path = %path.display(),
        step = checkpoint.step,
        parameters = checkpoint.parameter_count(),
        "checkpoint saved"
    );
    Ok(path)
}
