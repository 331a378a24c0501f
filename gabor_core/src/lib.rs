//! # Gabor Eye Core
//!
//! Deterministic stimulus synthesis and game logic for an orientation
//! training game built on Gabor patches: sinusoidal gratings under a
//! Gaussian envelope. Two modes are provided, find-the-matching-target and
//! find-all-pairs.
//!
//! ## Quick Start
//!
//! ```rust
//! use gabor_eye_core::{DeferredQueue, Feedback, GameConfig, Mode1Session, Session};
//!
//! let config = GameConfig::default();
//! let mut session = Mode1Session::seeded(config.target, 42);
//! let mut scheduler = DeferredQueue::new();
//!
//! let hit = session.layout().target_indices()[0];
//! let feedback = session.on_select(hit, &mut scheduler);
//! assert_eq!(feedback, Feedback::Correct { score: 10, round: 2 });
//!
//! // The next round is dealt when the scheduled event comes back.
//! let event = scheduler.pop_next().unwrap();
//! assert_eq!(session.fire(event, &mut scheduler), Feedback::RoundStarted { round: 2 });
//! ```
//!
//! ## Core Modules
//!
//! - [`patch`] - Pure patch synthesis and grayscale bitmaps
//! - [`angle`] - Orientation equivalence modulo π
//! - [`round`] - Round generators for both modes
//! - [`session`] - Selection state machines and deferred events
//! - [`config`] - Game configuration via TOML
//! - [`logging`] - In-memory session journal with JSONL export

pub mod angle;
pub mod config;
pub mod error;
pub mod logging;
pub mod patch;
pub mod round;
pub mod session;

pub use angle::{angular_equal, angular_equal_within, to_radians, Orientation, ANGLE_EPSILON};
pub use config::{ConfigError, GameConfig, PairModeConfig, TargetModeConfig};
pub use error::{GaborError, GaborResult};
pub use logging::{EventJournal, JournalEntry};
pub use patch::{gabor_patch, generate, PatchImage, PatchParams};
pub use round::{
    GridShape, Mode1RoundLayout, Mode2RoundLayout, PairRoundGenerator, TargetRoundGenerator,
};
pub use session::{
    CardStatus, CellStatus, DeferredAction, DeferredQueue, Feedback, GameMode, Generation,
    Mode1Session, Mode2Session, PairPhase, ScheduledEvent, Scheduler, Session, TargetPhase,
};
