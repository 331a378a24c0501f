//! Find-the-target session.
//!
//! ```text
//! AwaitingSelection --hit--> RoundComplete --AdvanceRound--> AwaitingSelection
//!        |  ^
//!        +--+ miss (cell marked Incorrect, still selectable)
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{
    DeferredAction, Feedback, GameMode, Generation, ScheduledEvent, Scheduler, Session,
};
use crate::config::TargetModeConfig;
use crate::logging::EventJournal;
use crate::round::{Mode1RoundLayout, TargetRoundGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Selectable,
    Correct,
    /// Wrong guess; shown as such but still accepts input
    Incorrect,
    Locked,
}

impl CellStatus {
    pub fn is_selectable(self) -> bool {
        matches!(self, CellStatus::Selectable | CellStatus::Incorrect)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPhase {
    AwaitingSelection,
    RoundComplete,
}

pub struct Mode1Session<R = StdRng> {
    generator: TargetRoundGenerator,
    rng: R,
    score: u32,
    round: u32,
    layout: Mode1RoundLayout,
    cell_status: Vec<CellStatus>,
    phase: TargetPhase,
    generation: Generation,
    journal: EventJournal,
}

impl Mode1Session<StdRng> {
    pub fn seeded(config: TargetModeConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Mode1Session<R> {
    /// Starts at round 1 with score 0 and a freshly dealt layout.
    pub fn new(config: TargetModeConfig, mut rng: R) -> Self {
        let generator = TargetRoundGenerator::new(config);
        let layout = generator.new_round(1, &mut rng);
        Self::with_layout(generator.config().clone(), layout, rng)
    }

    /// Starts from an explicit layout; the round number is taken from it.
    pub fn with_layout(config: TargetModeConfig, layout: Mode1RoundLayout, rng: R) -> Self {
        let cell_status = vec![CellStatus::Selectable; layout.cells.len()];
        Self {
            generator: TargetRoundGenerator::new(config),
            rng,
            score: 0,
            round: layout.round.max(1),
            layout,
            cell_status,
            phase: TargetPhase::AwaitingSelection,
            generation: Generation::default(),
            journal: EventJournal::default_for(GameMode::TargetMatch),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn layout(&self) -> &Mode1RoundLayout {
        &self.layout
    }

    pub fn phase(&self) -> TargetPhase {
        self.phase
    }

    pub fn cell_status(&self, index: usize) -> Option<CellStatus> {
        self.cell_status.get(index).copied()
    }

    pub fn statuses(&self) -> &[CellStatus] {
        &self.cell_status
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    fn deal(&mut self) {
        self.layout = self.generator.new_round(self.round, &mut self.rng);
        self.cell_status = vec![CellStatus::Selectable; self.layout.cells.len()];
        self.phase = TargetPhase::AwaitingSelection;
        self.generation = self.generation.next();
        tracing::debug!(
            round = self.round,
            generation = self.generation.value(),
            cells = self.layout.cells.len(),
            "target round dealt"
        );
    }

    fn emit(&mut self, feedback: Feedback) -> Feedback {
        if feedback.is_effective() {
            self.journal.record(self.round, self.generation, feedback);
        }
        feedback
    }
}

impl<R: Rng> Session for Mode1Session<R> {
    fn mode(&self) -> GameMode {
        GameMode::TargetMatch
    }

    fn round(&self) -> u32 {
        self.round
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn cell_count(&self) -> usize {
        self.layout.cells.len()
    }

    fn on_select<S: Scheduler + ?Sized>(&mut self, index: usize, scheduler: &mut S) -> Feedback {
        if self.phase != TargetPhase::AwaitingSelection {
            return Feedback::Ignored;
        }
        match self.cell_status.get(index) {
            Some(status) if status.is_selectable() => {}
            _ => return Feedback::Ignored,
        }

        if !self.layout.is_target(index) {
            self.cell_status[index] = CellStatus::Incorrect;
            return self.emit(Feedback::Incorrect);
        }

        for (cell, status) in self.cell_status.iter_mut().enumerate() {
            *status = if cell == index {
                CellStatus::Correct
            } else {
                CellStatus::Locked
            };
        }
        self.score = self
            .score
            .saturating_add(self.generator.config().points_per_hit);
        self.round = self.round.saturating_add(1);
        self.phase = TargetPhase::RoundComplete;
        scheduler.after(
            self.generator.config().advance_delay(),
            ScheduledEvent::new(self.generation, DeferredAction::AdvanceRound),
        );
        tracing::info!(score = self.score, next_round = self.round, "target found");

        self.emit(Feedback::Correct {
            score: self.score,
            round: self.round,
        })
    }

    fn fire<S: Scheduler + ?Sized>(
        &mut self,
        event: ScheduledEvent,
        _scheduler: &mut S,
    ) -> Feedback {
        if event.generation != self.generation {
            tracing::debug!(
                event = event.generation.value(),
                current = self.generation.value(),
                "discarding stale target event"
            );
            return Feedback::Stale;
        }
        match (event.action, self.phase) {
            (DeferredAction::AdvanceRound, TargetPhase::RoundComplete) => {
                self.deal();
                self.emit(Feedback::RoundStarted { round: self.round })
            }
            _ => Feedback::Ignored,
        }
    }

    fn restart(&mut self) -> Feedback {
        self.score = 0;
        self.round = 1;
        self.deal();
        self.emit(Feedback::RoundStarted { round: self.round })
    }
}
