//! Round generation for the find-the-target mode.
//!
//! Each round shows one target orientation above a 3×3 grid holding the
//! target and eight distractors. Correctness is judged by orientation value,
//! never by position, so any cell equivalent to the target is a hit.

use std::f64::consts::PI;

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::angle::{angular_equal, to_radians, Orientation};
use crate::config::TargetModeConfig;
use crate::error::GaborResult;
use crate::patch::{PatchImage, PatchParams};

pub const TARGET_GRID_ROWS: usize = 3;
pub const TARGET_GRID_COLS: usize = 3;
pub const TARGET_GRID_CELLS: usize = TARGET_GRID_ROWS * TARGET_GRID_COLS;
pub const DISTRACTOR_COUNT: usize = TARGET_GRID_CELLS - 1;

/// Stimulus layout of one find-the-target round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode1RoundLayout {
    pub round: u32,
    pub target_theta: Orientation,
    /// Row-major grid orientations; at least one equals `target_theta`
    pub cells: Vec<Orientation>,
    pub frequency: f64,
    pub sigma: f64,
    pub contrast: f64,
    pub size: usize,
}

impl Mode1RoundLayout {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether cell `index` shows the target orientation. Out-of-range
    /// indices are never targets.
    pub fn is_target(&self, index: usize) -> bool {
        self.cells
            .get(index)
            .map_or(false, |&theta| angular_equal(theta, self.target_theta))
    }

    pub fn target_indices(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&index| self.is_target(index))
            .collect()
    }

    pub fn patch_params(&self, theta: Orientation) -> PatchParams {
        PatchParams::new(self.size, theta, self.frequency, self.sigma, self.contrast)
    }

    pub fn render_target(&self) -> GaborResult<PatchImage> {
        self.patch_params(self.target_theta).render()
    }

    /// Renders every grid cell, in layout order.
    pub fn render_cells(&self) -> GaborResult<Vec<PatchImage>> {
        self.cells
            .par_iter()
            .map(|&theta| self.patch_params(theta).render())
            .collect()
    }
}

/// Produces [`Mode1RoundLayout`]s from the mode configuration.
#[derive(Debug, Clone, Default)]
pub struct TargetRoundGenerator {
    config: TargetModeConfig,
}

impl TargetRoundGenerator {
    pub fn new(config: TargetModeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TargetModeConfig {
        &self.config
    }

    /// Deals round `round`.
    ///
    /// The target is drawn from the canonical angle set. Each distractor is
    /// the target rotated by an independent integer offset from the
    /// configured range. Distractors are not checked against each other, so
    /// duplicates are possible and accepted.
    pub fn new_round<R: Rng + ?Sized>(&self, round: u32, rng: &mut R) -> Mode1RoundLayout {
        let target_deg = self
            .config
            .canonical_angles_deg
            .choose(rng)
            .copied()
            .unwrap_or(0);
        let target_theta = to_radians(target_deg as f64);

        let mut cells = Vec::with_capacity(TARGET_GRID_CELLS);
        cells.push(target_theta);
        for _ in 0..DISTRACTOR_COUNT {
            let offset = rng.gen_range(self.config.offset_min_deg..=self.config.offset_max_deg);
            cells.push((target_theta + to_radians(offset as f64)).rem_euclid(PI));
        }
        cells.shuffle(rng);

        let layout = Mode1RoundLayout {
            round,
            target_theta,
            cells,
            frequency: self.config.frequency_for_round(round),
            sigma: self.config.sigma,
            contrast: self.config.contrast,
            size: self.config.patch_size,
        };
        tracing::debug!(
            round,
            target_deg,
            frequency = layout.frequency,
            "dealt target round"
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn target_is_canonical_and_present() {
        let generator = TargetRoundGenerator::default();
        let canonical: Vec<Orientation> = generator
            .config()
            .canonical_angles_deg
            .iter()
            .map(|&deg| to_radians(deg as f64))
            .collect();
        let mut rng = StdRng::seed_from_u64(11);
        for round in 1..=50 {
            let layout = generator.new_round(round, &mut rng);
            assert_eq!(layout.len(), TARGET_GRID_CELLS);
            assert!(canonical.contains(&layout.target_theta));
            assert!(!layout.target_indices().is_empty());
        }
    }

    #[test]
    fn distractors_stay_within_offset_range() {
        let generator = TargetRoundGenerator::default();
        let mut rng = StdRng::seed_from_u64(5);
        for round in 1..=50 {
            let layout = generator.new_round(round, &mut rng);
            for (index, &theta) in layout.cells.iter().enumerate() {
                assert!((0.0..PI).contains(&theta) || theta == layout.target_theta);
                if layout.is_target(index) {
                    continue;
                }
                let offset = (theta - layout.target_theta).rem_euclid(PI).to_degrees();
                assert!(
                    (20.0 - 1e-6..=160.0 + 1e-6).contains(&offset),
                    "offset {offset} out of range"
                );
            }
        }
    }

    #[test]
    fn round_scales_frequency_only() {
        let generator = TargetRoundGenerator::default();
        let mut rng = StdRng::seed_from_u64(3);
        let first = generator.new_round(1, &mut rng);
        let tenth = generator.new_round(10, &mut rng);
        assert!((first.frequency - 4.2).abs() < 1e-12);
        assert!((tenth.frequency - 6.0).abs() < 1e-12);
        assert_eq!(first.size, 120);
        assert_eq!(tenth.size, 120);
        assert_eq!(first.sigma, tenth.sigma);
    }

    #[test]
    fn same_seed_deals_same_round() {
        let generator = TargetRoundGenerator::default();
        let a = generator.new_round(2, &mut StdRng::seed_from_u64(99));
        let b = generator.new_round(2, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_distractors_are_kept() {
        let generator = TargetRoundGenerator::default();
        let duplicated = (0..2000u64).find_map(|seed| {
            let layout = generator.new_round(1, &mut StdRng::seed_from_u64(seed));
            let distractors: Vec<usize> = (0..layout.len())
                .filter(|&index| !layout.is_target(index))
                .collect();
            distractors.iter().enumerate().find_map(|(pos, &a)| {
                distractors[pos + 1..]
                    .iter()
                    .find(|&&b| layout.cells[a].to_bits() == layout.cells[b].to_bits())
                    .map(|&b| (layout.clone(), a, b))
            })
        });

        let (layout, a, b) = duplicated.expect("some seed repeats a distractor");
        assert_ne!(a, b);
        assert_eq!(layout.len(), TARGET_GRID_CELLS);
        assert_eq!(layout.cells[a], layout.cells[b]);
        assert!(!layout.is_target(a));
        assert_eq!(layout.target_indices().len(), 1);
    }

    #[test]
    fn out_of_range_index_is_not_target() {
        let generator = TargetRoundGenerator::default();
        let layout = generator.new_round(1, &mut StdRng::seed_from_u64(1));
        assert!(!layout.is_target(TARGET_GRID_CELLS));
    }

    #[test]
    fn renders_target_and_cells_in_order() {
        let config = TargetModeConfig {
            patch_size: 16,
            ..TargetModeConfig::default()
        };
        let generator = TargetRoundGenerator::new(config);
        let layout = generator.new_round(1, &mut StdRng::seed_from_u64(8));
        let target = layout.render_target().unwrap();
        let cells = layout.render_cells().unwrap();
        assert_eq!(cells.len(), TARGET_GRID_CELLS);
        for index in layout.target_indices() {
            assert_eq!(cells[index], target);
        }
    }
}
