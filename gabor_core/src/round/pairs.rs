//! Round generation for the find-all-pairs mode.
//!
//! A round deals `num_pairs` base orientations, each twice, shuffled into a
//! row-major grid. The grid shape comes from a fixed table; slots beyond the
//! dealt cards stay empty and never accept input.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::angle::{to_radians, Orientation};
use crate::config::PairModeConfig;
use crate::error::GaborResult;
use crate::patch::{PatchImage, PatchParams};

/// Grid dimensions for a pairs round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    /// Smallest table entry holding `num_items` cards:
    /// ≤4 → 2×2, ≤8 → 4×2, ≤12 → 4×3, otherwise 4×4.
    pub fn for_items(num_items: usize) -> Self {
        let (rows, cols) = match num_items {
            0..=4 => (2, 2),
            5..=8 => (4, 2),
            9..=12 => (4, 3),
            _ => (4, 4),
        };
        Self { rows, cols }
    }

    pub fn slots(&self) -> usize {
        self.rows * self.cols
    }
}

/// Stimulus layout of one pairs round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode2RoundLayout {
    pub round: u32,
    pub num_pairs: usize,
    pub grid: GridShape,
    /// Row-major card orientations, `2 * num_pairs` long
    pub cells: Vec<Orientation>,
    pub size: usize,
    pub frequency: f64,
    pub sigma: f64,
    pub contrast: f64,
}

impl Mode2RoundLayout {
    pub fn num_items(&self) -> usize {
        self.cells.len()
    }

    /// `(row, col)` of card `index` in the grid.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.grid.cols, index % self.grid.cols)
    }

    /// Orientation shown at `(row, col)`, or `None` for an empty slot.
    pub fn slot(&self, row: usize, col: usize) -> Option<Orientation> {
        if row >= self.grid.rows || col >= self.grid.cols {
            return None;
        }
        self.cells.get(row * self.grid.cols + col).copied()
    }

    pub fn patch_params(&self, theta: Orientation) -> PatchParams {
        PatchParams::new(self.size, theta, self.frequency, self.sigma, self.contrast)
    }

    /// Renders every card, in layout order.
    pub fn render_cells(&self) -> GaborResult<Vec<PatchImage>> {
        self.cells
            .par_iter()
            .map(|&theta| self.patch_params(theta).render())
            .collect()
    }
}

/// Produces [`Mode2RoundLayout`]s from the mode configuration.
#[derive(Debug, Clone, Default)]
pub struct PairRoundGenerator {
    config: PairModeConfig,
}

impl PairRoundGenerator {
    pub fn new(config: PairModeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PairModeConfig {
        &self.config
    }

    /// Deals round `round`.
    ///
    /// Base orientations are independent integer degrees in `[0, 179]`. Two
    /// different pairs may share an orientation; that is accepted, not
    /// filtered.
    pub fn new_round<R: Rng + ?Sized>(&self, round: u32, rng: &mut R) -> Mode2RoundLayout {
        let num_pairs = self.config.pairs_for_round(round);
        let num_items = num_pairs * 2;
        let grid = GridShape::for_items(num_items);

        let base: Vec<Orientation> = (0..num_pairs)
            .map(|_| to_radians(rng.gen_range(0u32..180) as f64))
            .collect();
        let mut cells = Vec::with_capacity(num_items);
        cells.extend_from_slice(&base);
        cells.extend_from_slice(&base);
        cells.shuffle(rng);

        tracing::debug!(
            round,
            num_pairs,
            rows = grid.rows,
            cols = grid.cols,
            "dealt pairs round"
        );

        Mode2RoundLayout {
            round,
            num_pairs,
            grid,
            cells,
            size: self.config.patch_size,
            frequency: self.config.frequency,
            sigma: self.config.sigma,
            contrast: self.config.contrast,
        }
    }
}
