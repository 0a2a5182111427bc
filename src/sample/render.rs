//! Grid PNG output

use crate::error::{Error, Result};
use image::{GrayImage, ImageBuffer};
use ndarray::{Array2, Array3};
use std::path::Path;

/// Min-max normalize over the whole array to `[0, 1]`
///
/// A constant input maps to all zeros.
pub fn normalize(images: &Array3<f32>) -> Array3<f32> {
    let (min, max) = images
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return Array3::zeros(images.raw_dim());
    }
    images.mapv(|v| (v - min) / range)
}

/// Tile `[N, H, W]` images into one canvas, `nrow` images per row
///
/// Each tile is surrounded by `padding` zero pixels.
pub fn make_grid(images: &Array3<f32>, nrow: usize, padding: usize) -> Array2<f32> {
    let (n, h, w) = images.dim();
    let ncol = nrow.clamp(1, n.max(1));
    let rows = n.div_ceil(ncol).max(1);
    let height = rows * (h + padding) + padding;
    let width = ncol * (w + padding) + padding;

    let mut grid = Array2::zeros((height, width));
    for (k, image) in images.outer_iter().enumerate() {
        let top = (k / ncol) * (h + padding) + padding;
        let left = (k % ncol) * (w + padding) + padding;
        grid.slice_mut(ndarray::s![top..top + h, left..left + w]).assign(&image);
    }
    grid
}

/// Normalize, tile and write as 8-bit grayscale PNG
pub fn save_image(images: &Array3<f32>, path: impl AsRef<Path>, nrow: usize, padding: usize) -> Result<()> {
    let grid = make_grid(&normalize(images), nrow, padding);
    let (height, width) = grid.dim();
    let pixels: Vec<u8> = grid
        .iter()
        .map(|&v| (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8)
        .collect();
    let to_u32 = |v: usize| u32::try_from(v).map_err(|_| Error::shape("image size", &[u32::MAX as usize], &[v]));
    let img: GrayImage = ImageBuffer::from_raw(to_u32(width)?, to_u32(height)?, pixels)
        .ok_or_else(|| Error::shape("image buffer", &[height, width], &[grid.len()]))?;
    img.save(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), width, height, "image saved");
    Ok(())
}
