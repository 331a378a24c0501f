//! Game configuration via TOML files.
//!
//! Every key is optional; missing keys fall back to the defaults of the
//! shipped game. Values are validated after parsing so that a configuration
//! that loads successfully always produces valid patch parameters.
//!
//! ```toml
//! [engine]
//! seed = 42
//!
//! [target]
//! patch_size = 120
//! canonical_angles_deg = [0, 30, 45, 60, 90, 120, 135, 150]
//!
//! [pairs]
//! max_pairs = 8
//! reveal_delay_ms = 500
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Hard cap on pairs per round; the largest grid holds 16 cards.
pub const MAX_PAIRS: usize = 8;

/// Top-level configuration for both game modes.
///
/// # Examples
///
/// ```
/// use gabor_eye_core::GameConfig;
///
/// let config = GameConfig::load_from_file("config/game.toml")
///     .unwrap_or_else(|_| GameConfig::default());
/// assert!(config.pairs.max_pairs <= 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameConfig {
    /// Seed for sessions built through [`GameConfig::seed`]
    pub seed: u64,
    pub target: TargetModeConfig,
    pub pairs: PairModeConfig,
}

impl GameConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawGameConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        Ok(Self {
            seed: raw.engine.seed,
            target: TargetModeConfig::try_from(&raw.target)?,
            pairs: PairModeConfig::try_from(&raw.pairs)?,
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            target: TargetModeConfig::default(),
            pairs: PairModeConfig::default(),
        }
    }
}

/// Find-the-target mode parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetModeConfig {
    pub patch_size: usize,
    pub sigma: f64,
    pub contrast: f64,
    /// Carrier frequency before the per-round increment
    pub base_frequency: f64,
    /// Frequency added per round number
    pub frequency_step: f64,
    /// Candidate target orientations, in degrees
    pub canonical_angles_deg: Vec<u32>,
    /// Inclusive lower bound of the distractor offset from the target
    pub offset_min_deg: u32,
    /// Inclusive upper bound of the distractor offset from the target
    pub offset_max_deg: u32,
    pub points_per_hit: u32,
    pub advance_delay_ms: u64,
}

impl TargetModeConfig {
    /// Carrier frequency for `round`; difficulty rises with the round number.
    pub fn frequency_for_round(&self, round: u32) -> f64 {
        self.base_frequency + round as f64 * self.frequency_step
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    fn try_from(raw: &RawTarget) -> Result<Self, ConfigError> {
        validate_patch("target", raw.patch_size, raw.sigma, raw.base_frequency)?;
        if !raw.contrast.is_finite() {
            return Err(ConfigError::Parse("target.contrast must be finite".into()));
        }
        if !raw.frequency_step.is_finite() || raw.frequency_step < 0.0 {
            return Err(ConfigError::Parse(
                "target.frequency_step must be non-negative".into(),
            ));
        }
        if raw.canonical_angles_deg.is_empty() {
            return Err(ConfigError::Parse(
                "target.canonical_angles_deg must not be empty".into(),
            ));
        }
        if raw.canonical_angles_deg.iter().any(|&deg| deg >= 180) {
            return Err(ConfigError::Parse(
                "target.canonical_angles_deg entries must be below 180".into(),
            ));
        }
        if raw.offset_min_deg == 0
            || raw.offset_max_deg >= 180
            || raw.offset_min_deg > raw.offset_max_deg
        {
            return Err(ConfigError::Parse(
                "target offsets must satisfy 0 < offset_min_deg <= offset_max_deg < 180".into(),
            ));
        }

        Ok(Self {
            patch_size: raw.patch_size,
            sigma: raw.sigma,
            contrast: raw.contrast,
            base_frequency: raw.base_frequency,
            frequency_step: raw.frequency_step,
            canonical_angles_deg: raw.canonical_angles_deg.clone(),
            offset_min_deg: raw.offset_min_deg,
            offset_max_deg: raw.offset_max_deg,
            points_per_hit: raw.points_per_hit,
            advance_delay_ms: raw.advance_delay_ms,
        })
    }
}

impl Default for TargetModeConfig {
    fn default() -> Self {
        Self {
            patch_size: default_target_patch_size(),
            sigma: default_sigma(),
            contrast: default_contrast(),
            base_frequency: default_base_frequency(),
            frequency_step: default_frequency_step(),
            canonical_angles_deg: default_canonical_angles(),
            offset_min_deg: default_offset_min(),
            offset_max_deg: default_offset_max(),
            points_per_hit: default_points_per_hit(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

/// Find-all-pairs mode parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairModeConfig {
    pub patch_size: usize,
    pub frequency: f64,
    pub sigma: f64,
    pub contrast: f64,
    /// Pairs dealt in round 1
    pub initial_pairs: usize,
    /// Pairs added per subsequent round
    pub pairs_step: usize,
    /// Cap on pairs per round, at most [`MAX_PAIRS`]
    pub max_pairs: usize,
    /// Time both selected cards stay visible before the pair resolves
    pub reveal_delay_ms: u64,
    pub advance_delay_ms: u64,
}

impl PairModeConfig {
    /// Number of pairs dealt in `round` (1-based), capped at `max_pairs`.
    pub fn pairs_for_round(&self, round: u32) -> usize {
        let extra = (round.max(1) - 1) as usize;
        self.initial_pairs
            .saturating_add(extra.saturating_mul(self.pairs_step))
            .min(self.max_pairs)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    fn try_from(raw: &RawPairs) -> Result<Self, ConfigError> {
        validate_patch("pairs", raw.patch_size, raw.sigma, raw.frequency)?;
        if !raw.contrast.is_finite() {
            return Err(ConfigError::Parse("pairs.contrast must be finite".into()));
        }
        if raw.max_pairs == 0 || raw.max_pairs > MAX_PAIRS {
            return Err(ConfigError::Parse(format!(
                "pairs.max_pairs must be between 1 and {MAX_PAIRS}"
            )));
        }
        if raw.initial_pairs == 0 || raw.initial_pairs > raw.max_pairs {
            return Err(ConfigError::Parse(
                "pairs.initial_pairs must be between 1 and max_pairs".into(),
            ));
        }

        Ok(Self {
            patch_size: raw.patch_size,
            frequency: raw.frequency,
            sigma: raw.sigma,
            contrast: raw.contrast,
            initial_pairs: raw.initial_pairs,
            pairs_step: raw.pairs_step,
            max_pairs: raw.max_pairs,
            reveal_delay_ms: raw.reveal_delay_ms,
            advance_delay_ms: raw.advance_delay_ms,
        })
    }
}

impl Default for PairModeConfig {
    fn default() -> Self {
        Self {
            patch_size: default_pairs_patch_size(),
            frequency: default_base_frequency(),
            sigma: default_sigma(),
            contrast: default_contrast(),
            initial_pairs: default_initial_pairs(),
            pairs_step: default_pairs_step(),
            max_pairs: MAX_PAIRS,
            reveal_delay_ms: default_reveal_delay_ms(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

fn validate_patch(section: &str, size: usize, sigma: f64, frequency: f64) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::Parse(format!(
            "{section}.patch_size must be non-zero"
        )));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ConfigError::Parse(format!("{section}.sigma must be positive")));
    }
    if !frequency.is_finite() || frequency < 0.0 {
        return Err(ConfigError::Parse(format!(
            "{section} frequency must be non-negative"
        )));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct RawGameConfig {
    #[serde(default)]
    engine: RawEngine,
    #[serde(default)]
    target: RawTarget,
    #[serde(default)]
    pairs: RawPairs,
}

#[derive(Debug, Deserialize)]
struct RawEngine {
    #[serde(default = "default_seed")]
    seed: u64,
}

impl Default for RawEngine {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    #[serde(default = "default_target_patch_size")]
    patch_size: usize,
    #[serde(default = "default_sigma")]
    sigma: f64,
    #[serde(default = "default_contrast")]
    contrast: f64,
    #[serde(default = "default_base_frequency")]
    base_frequency: f64,
    #[serde(default = "default_frequency_step")]
    frequency_step: f64,
    #[serde(default = "default_canonical_angles")]
    canonical_angles_deg: Vec<u32>,
    #[serde(default = "default_offset_min")]
    offset_min_deg: u32,
    #[serde(default = "default_offset_max")]
    offset_max_deg: u32,
    #[serde(default = "default_points_per_hit")]
    points_per_hit: u32,
    #[serde(default = "default_advance_delay_ms")]
    advance_delay_ms: u64,
}

impl Default for RawTarget {
    fn default() -> Self {
        Self {
            patch_size: default_target_patch_size(),
            sigma: default_sigma(),
            contrast: default_contrast(),
            base_frequency: default_base_frequency(),
            frequency_step: default_frequency_step(),
            canonical_angles_deg: default_canonical_angles(),
            offset_min_deg: default_offset_min(),
            offset_max_deg: default_offset_max(),
            points_per_hit: default_points_per_hit(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPairs {
    #[serde(default = "default_pairs_patch_size")]
    patch_size: usize,
    #[serde(default = "default_base_frequency")]
    frequency: f64,
    #[serde(default = "default_sigma")]
    sigma: f64,
    #[serde(default = "default_contrast")]
    contrast: f64,
    #[serde(default = "default_initial_pairs")]
    initial_pairs: usize,
    #[serde(default = "default_pairs_step")]
    pairs_step: usize,
    #[serde(default = "default_max_pairs")]
    max_pairs: usize,
    #[serde(default = "default_reveal_delay_ms")]
    reveal_delay_ms: u64,
    #[serde(default = "default_advance_delay_ms")]
    advance_delay_ms: u64,
}

impl Default for RawPairs {
    fn default() -> Self {
        Self {
            patch_size: default_pairs_patch_size(),
            frequency: default_base_frequency(),
            sigma: default_sigma(),
            contrast: default_contrast(),
            initial_pairs: default_initial_pairs(),
            pairs_step: default_pairs_step(),
            max_pairs: default_max_pairs(),
            reveal_delay_ms: default_reveal_delay_ms(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_target_patch_size() -> usize {
    120
}

fn default_pairs_patch_size() -> usize {
    100
}

fn default_sigma() -> f64 {
    0.35
}

fn default_contrast() -> f64 {
    0.9
}

fn default_base_frequency() -> f64 {
    4.0
}

fn default_frequency_step() -> f64 {
    0.2
}

fn default_canonical_angles() -> Vec<u32> {
    vec![0, 30, 45, 60, 90, 120, 135, 150]
}

fn default_offset_min() -> u32 {
    20
}

fn default_offset_max() -> u32 {
    160
}

fn default_points_per_hit() -> u32 {
    10
}

fn default_advance_delay_ms() -> u64 {
    1000
}

fn default_initial_pairs() -> usize {
    2
}

fn default_pairs_step() -> usize {
    2
}

fn default_max_pairs() -> usize {
    MAX_PAIRS
}

fn default_reveal_delay_ms() -> u64 {
    500
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.target.patch_size, 120);
        assert_eq!(config.pairs.patch_size, 100);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn parses_custom_values() {
        let toml = r#"
[engine]
seed = 7

[target]
patch_size = 64
canonical_angles_deg = [0, 90]
offset_min_deg = 30
offset_max_deg = 150

[pairs]
initial_pairs = 3
pairs_step = 1
max_pairs = 5
reveal_delay_ms = 250
"#;
        let config = GameConfig::from_str(toml).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.target.patch_size, 64);
        assert_eq!(config.target.canonical_angles_deg, vec![0, 90]);
        assert_eq!(config.target.offset_min_deg, 30);
        assert!((config.target.sigma - 0.35).abs() < f64::EPSILON);
        assert_eq!(config.pairs.initial_pairs, 3);
        assert_eq!(config.pairs.reveal_delay(), Duration::from_millis(250));
    }

    #[test]
    fn frequency_rises_with_round() {
        let target = TargetModeConfig::default();
        assert!((target.frequency_for_round(1) - 4.2).abs() < 1e-12);
        assert!((target.frequency_for_round(5) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn pair_count_is_capped() {
        let pairs = PairModeConfig::default();
        let counts: Vec<usize> = (1..=6).map(|round| pairs.pairs_for_round(round)).collect();
        assert_eq!(counts, vec![2, 4, 6, 8, 8, 8]);
        assert_eq!(pairs.pairs_for_round(0), 2);
        assert_eq!(pairs.pairs_for_round(u32::MAX), 8);
    }

    #[test]
    fn rejects_invalid_sections() {
        let cases = [
            "[target]\nsigma = 0.0",
            "[target]\npatch_size = 0",
            "[target]\ncanonical_angles_deg = []",
            "[target]\ncanonical_angles_deg = [180]",
            "[target]\noffset_min_deg = 100\noffset_max_deg = 50",
            "[pairs]\nfrequency = -1.0",
            "[pairs]\nmax_pairs = 9",
            "[pairs]\ninitial_pairs = 4\nmax_pairs = 3",
        ];
        for toml in cases {
            assert!(
                matches!(GameConfig::from_str(toml), Err(ConfigError::Parse(_))),
                "accepted {toml:?}"
            );
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load_from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
