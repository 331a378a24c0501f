//! Round generators for both game modes.
//!
//! Generators are stateless apart from their configuration and draw all
//! randomness from the generator passed in, so a seeded generator deals a
//! reproducible sequence of rounds.

pub mod pairs;
pub mod target;

pub use pairs::{GridShape, Mode2RoundLayout, PairRoundGenerator};
pub use target::{Mode1RoundLayout, TargetRoundGenerator, TARGET_GRID_CELLS};
