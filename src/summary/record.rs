//! Summary record types

use crate::sample::{make_grid, normalize};
use chrono::{DateTime, Utc};
use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Buckets per histogram
pub const HISTOGRAM_BUCKETS: usize = 30;

/// Fixed-width histogram between the observed extremes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub count: usize,
    pub buckets: Vec<u64>,
}

impl Histogram {
    /// Non-finite values are skipped.
    pub fn from_values(values: &[f32]) -> Self {
        let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let mut buckets = vec![0u64; HISTOGRAM_BUCKETS];
        if finite.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                count: 0,
                buckets,
            };
        }

        let min = finite.iter().copied().fold(f32::INFINITY, f32::min);
        let max = finite.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let width = (max - min) / HISTOGRAM_BUCKETS as f32;
        for &v in &finite {
            let idx = if width > 0.0 {
                (((v - min) / width) as usize).min(HISTOGRAM_BUCKETS - 1)
            } else {
                0
            };
            buckets[idx] += 1;
        }
        Self {
            min,
            max,
            mean: finite.iter().sum::<f32>() / finite.len() as f32,
            count: finite.len(),
            buckets,
        }
    }
}

/// Payload of a summary record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SummaryValue {
    Scalar { value: f32 },
    /// Normalized grid as 8-bit grayscale, row-major
    Image {
        height: usize,
        width: usize,
        pixels: Vec<u8>,
    },
    Histogram(Histogram),
}

/// One step-tagged record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub step: u64,
    pub tag: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub value: SummaryValue,
}

impl SummaryRecord {
    pub fn new(step: u64, tag: &str, value: SummaryValue) -> Self {
        Self {
            step,
            tag: tag.to_string(),
            timestamp: Utc::now(),
            value,
        }
    }

    pub fn scalar(step: u64, tag: &str, value: f32) -> Self {
        Self::new(step, tag, SummaryValue::Scalar { value })
    }

    pub fn image(step: u64, tag: &str, images: &Array3<f32>) -> Self {
        let grid = make_grid(&normalize(images), images.dim().0, 1);
        let (height, width) = grid.dim();
        let pixels = grid
            .iter()
            .map(|&v| (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8)
            .collect();
        Self::new(
            step,
            tag,
            SummaryValue::Image {
                height,
                width,
                pixels,
            },
        )
    }

    pub fn histogram(step: u64, tag: &str, values: &[f32]) -> Self {
        Self::new(step, tag, SummaryValue::Histogram(Histogram::from_values(values)))
    }

    /// Scalar payload, if any
    pub fn as_scalar(&self) -> Option<f32> {
        match self.value {
            SummaryValue::Scalar { value } => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts() {
        let h = Histogram::from_values(&[0.0, 0.5, 1.0, 1.0, f32::NAN]);
        assert_eq!(h.count, 4);
        assert_eq!(h.buckets.iter().sum::<u64>(), 4);
        assert_eq!(h.buckets[0], 1);
        assert_eq!(h.buckets[HISTOGRAM_BUCKETS - 1], 2);
        assert_eq!(h.min, 0.0);
        assert_eq!(h.max, 1.0);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let h = Histogram::from_values(&[2.0; 5]);
        assert_eq!(h.buckets[0], 5);
        let empty = Histogram::from_values(&[]);
        assert_eq!(empty.count, 0);
    }

    #[test]
    fn test_image_record_is_tiled() {
        let images = Array3::from_shape_fn((2, 3, 4), |(n, y, x)| (n + y + x) as f32);
        let record = SummaryRecord::image(3, "xym/G", &images);
        match record.value {
            SummaryValue::Image {
                height,
                width,
                pixels,
            } => {
                assert_eq!((height, width), (5, 11));
                assert_eq!(pixels.len(), 55);
                assert_eq!(pixels.iter().copied().max(), Some(255));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_json_shape() {
        let record = SummaryRecord::scalar(5, "loss/g_loss", 0.25);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "scalar");
        assert_eq!(json["tag"], "loss/g_loss");
        assert_eq!(json["step"], 5);
        let back: SummaryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.as_scalar(), Some(0.25));
    }
}
