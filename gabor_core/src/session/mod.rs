//! Selection state machines for both game modes.
//!
//! An input collaborator reports a selected cell through
//! [`Session::on_select`]; the session mutates its own state and answers with
//! a [`Feedback`] for display. Delayed work is requested from a
//! [`Scheduler`] and comes back through [`Session::fire`].

pub mod pairs;
pub mod scheduler;
pub mod target;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use pairs::{CardStatus, Mode2Session, PairPhase};
pub use scheduler::{DeferredAction, DeferredQueue, Generation, ScheduledEvent, Scheduler};
pub use target::{CellStatus, Mode1Session, TargetPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    TargetMatch,
    PairMatch,
}

/// Result of a selection or of a fired deferred event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Feedback {
    /// Input had no effect
    Ignored,
    /// Target found; carries the new score and the round that comes next
    Correct { score: u32, round: u32 },
    Incorrect,
    /// First card of a pair revealed
    Selected,
    /// Second card revealed; resolution is scheduled
    PairPending,
    MatchFound { matched: usize, total: usize },
    NoMatch,
    /// Every pair matched; carries the round that comes next
    RoundComplete { round: u32 },
    RoundStarted { round: u32 },
    /// Deferred event belonged to a replaced layout
    Stale,
}

impl Feedback {
    /// Whether the input or event changed session state.
    pub fn is_effective(&self) -> bool {
        !matches!(self, Feedback::Ignored | Feedback::Stale)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Ignored | Feedback::Stale | Feedback::Selected | Feedback::PairPending => {
                Ok(())
            }
            Feedback::Correct { .. } => write!(f, "Correct!"),
            Feedback::Incorrect => write!(f, "Look again carefully."),
            Feedback::MatchFound { .. } => write!(f, "Match!"),
            Feedback::NoMatch => write!(f, "Different."),
            Feedback::RoundComplete { .. } => write!(f, "All pairs found!"),
            Feedback::RoundStarted { round } => write!(f, "Round {}", round),
        }
    }
}

/// Common surface of both game modes.
pub trait Session {
    fn mode(&self) -> GameMode;

    fn round(&self) -> u32;

    fn generation(&self) -> Generation;

    /// Number of selectable positions in the current layout.
    fn cell_count(&self) -> usize;

    /// Handles a selection of cell `index`. Invalid, resolved, or
    /// out-of-range indices yield [`Feedback::Ignored`].
    fn on_select<S: Scheduler + ?Sized>(&mut self, index: usize, scheduler: &mut S) -> Feedback;

    /// Runs a deferred event. Events from another generation yield
    /// [`Feedback::Stale`] and change nothing.
    fn fire<S: Scheduler + ?Sized>(&mut self, event: ScheduledEvent, scheduler: &mut S)
        -> Feedback;

    /// Returns to round 1 with a fresh layout, invalidating in-flight events.
    fn restart(&mut self) -> Feedback;
}
