//! Checkpoint loading

use super::checkpoint::{Checkpoint, CHECKPOINT_PREFIX};
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Read a checkpoint written by [`super::save_checkpoint`]
pub fn load_checkpoint(path: impl AsRef<Path>) -> Result<Checkpoint> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|e| Error::Serialization(format!("checkpoint {}: {e}", path.display())))
}

/// Checkpoint with the highest step in `dir`, if any
pub fn latest_checkpoint(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(None);
    }
    let prefix = format!("{CHECKPOINT_PREFIX}-");
    let mut best: Option<(u64, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let step = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(&prefix))
            .and_then(|s| s.parse::<u64>().ok());
        if let Some(step) = step {
            if best.as_ref().is_none_or(|(b, _)| step > *b) {
                best = Some((step, path));
            }
        }
    }
    Ok(best.map(|(_, path)| path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingMode;
    use crate::io::save_checkpoint;
    use crate::network::Parameter;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let params = vec![Parameter::zeros("bias", &[4])];
        let ckpt = Checkpoint::capture(10, 2.5e-6, TrainingMode::Adversarial, &[("generator", params.as_slice())]);

        let path = save_checkpoint(&ckpt, dir.path()).unwrap();
        assert!(path.ends_with("model.ckpt-10"));
        let loaded = load_checkpoint(&path).unwrap();
        assert_eq!(loaded, ckpt);
    }

    #[test]
    fn test_latest_picks_highest_step() {
        let dir = TempDir::new().unwrap();
        for step in [5, 120, 40] {
            let ckpt = Checkpoint::capture(step, 1e-4, TrainingMode::Plain, &[]);
            save_checkpoint(&ckpt, dir.path()).unwrap();
        }
        std::fs::write(dir.path().join("model.ckpt-notes"), "x").unwrap();
        let latest = latest_checkpoint(dir.path()).unwrap().unwrap();
        assert!(latest.ends_with("model.ckpt-120"));
    }

    #[test]
    fn test_latest_in_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(latest_checkpoint(dir.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn test_load_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.ckpt-1");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_checkpoint(&path), Err(Error::Serialization(_))));
    }
}
