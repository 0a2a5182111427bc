//! Line-delimited JSON summary writer

use super::record::SummaryRecord;
use super::traits::SummarySink;
use crate::error::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Summary file name inside the model directory
pub const SUMMARY_FILE: &str = "summary.jsonl";

/// Appends one JSON object per record to `<dir>/summary.jsonl`
pub struct JsonlSummaryWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonlSummaryWriter {
    /// Create `dir` if needed and open the summary file for appending
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(SUMMARY_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse every record of an existing summary file
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<SummaryRecord>> {
        let content = fs::read_to_string(path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(serde_json::from_str(line)?))
            .collect()
    }
}

impl SummarySink for JsonlSummaryWriter {
    fn write(&mut self, record: SummaryRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlSummaryWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use tempfile::TempDir;

    #[test]
    fn test_records_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let mut writer = JsonlSummaryWriter::open(dir.path().join("run")).unwrap();
        writer.scalar(0, "loss/g_loss", 1.5).unwrap();
        writer.histogram(0, "y", &[0.1, 0.2, 0.3]).unwrap();
        writer.image(0, "xym/x", &Array3::zeros((1, 2, 2))).unwrap();
        writer.flush().unwrap();

        let records = JsonlSummaryWriter::read_all(writer.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_scalar(), Some(1.5));
        assert_eq!(records[1].tag, "y");
    }

    #[test]
    fn test_reopen_appends() {
        let dir = TempDir::new().unwrap();
        {
            let mut writer = JsonlSummaryWriter::open(dir.path()).unwrap();
            writer.scalar(1, "a", 1.0).unwrap();
        }
        {
            let mut writer = JsonlSummaryWriter::open(dir.path()).unwrap();
            writer.scalar(2, "a", 2.0).unwrap();
        }
        let records = JsonlSummaryWriter::read_all(dir.path().join(SUMMARY_FILE)).unwrap();
        assert_eq!(records.iter().map(|r| r.step).collect::<Vec<_>>(), vec![1, 2]);
    }
}
