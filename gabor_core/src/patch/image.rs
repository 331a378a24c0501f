use std::path::Path;

use plotters::prelude::*;
use rayon::prelude::*;

use crate::error::{GaborError, GaborResult};

/// Square 8-bit grayscale bitmap in row-major order.
///
/// Images are immutable once synthesized. The rendering layer owns their
/// display lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchImage {
    size: usize,
    pixels: Vec<u8>,
}

impl PatchImage {
    pub(crate) fn from_raw(size: usize, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), size * size);
        Self { size, pixels }
    }

    /// Edge length in pixels
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn pixel(&self, row: usize, col: usize) -> u8 {
        self.pixels[row * self.size + col]
    }

    /// Row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.pixels.chunks_exact(self.size)
    }

    /// Row-major intensity buffer of `size * size` bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    pub fn mean_intensity(&self) -> f64 {
        let pixels = self.as_slice();
        let total: u64 = pixels.par_iter().map(|&value| value as u64).sum();
        total as f64 / pixels.len() as f64
    }

    /// Writes the patch as a grayscale PNG, creating parent directories.
    pub fn to_png<P: AsRef<Path>>(&self, path: P) -> GaborResult<()> {
        let size = self.size();
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let backend = BitMapBackend::new(path, (size as u32, size as u32));
        let drawing_area = backend.into_drawing_area();

        for (row, line) in self.rows().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                drawing_area
                    .draw_pixel((col as i32, row as i32), &RGBColor(value, value, value))
                    .map_err(GaborError::render)?;
            }
        }

        drawing_area.present().map_err(GaborError::render)
    }
}
