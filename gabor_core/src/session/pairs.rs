//! Find-all-pairs session.
//!
//! Cards move `Hidden -> Selected -> {Matched | Hidden}`. Two selected cards
//! stay revealed until the scheduled [`DeferredAction::ResolvePair`] fires;
//! while they are pending every other click is ignored. Matching the last
//! pair schedules the next round.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{
    DeferredAction, Feedback, GameMode, Generation, ScheduledEvent, Scheduler, Session,
};
use crate::angle::angular_equal;
use crate::config::PairModeConfig;
use crate::logging::EventJournal;
use crate::round::{Mode2RoundLayout, PairRoundGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardStatus {
    Hidden,
    Selected,
    /// Cleared from play; terminal for the round
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairPhase {
    AwaitingSelection,
    /// Two cards revealed, resolution pending
    Revealing,
    RoundComplete,
}

pub struct Mode2Session<R = StdRng> {
    generator: PairRoundGenerator,
    rng: R,
    round: u32,
    layout: Mode2RoundLayout,
    card_status: Vec<CardStatus>,
    selection: Vec<usize>,
    matched: usize,
    phase: PairPhase,
    generation: Generation,
    journal: EventJournal,
}

impl Mode2Session<StdRng> {
    pub fn seeded(config: PairModeConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Mode2Session<R> {
    pub fn new(config: PairModeConfig, mut rng: R) -> Self {
        let generator = PairRoundGenerator::new(config);
        let layout = generator.new_round(1, &mut rng);
        Self::with_layout(generator.config().clone(), layout, rng)
    }

    /// Starts from an explicit layout; the round number is taken from it.
    pub fn with_layout(config: PairModeConfig, layout: Mode2RoundLayout, rng: R) -> Self {
        let card_status = vec![CardStatus::Hidden; layout.cells.len()];
        Self {
            generator: PairRoundGenerator::new(config),
            rng,
            round: layout.round.max(1),
            layout,
            card_status,
            selection: Vec::with_capacity(2),
            matched: 0,
            phase: PairPhase::AwaitingSelection,
            generation: Generation::default(),
            journal: EventJournal::default_for(GameMode::PairMatch),
        }
    }

    pub fn layout(&self) -> &Mode2RoundLayout {
        &self.layout
    }

    pub fn phase(&self) -> PairPhase {
        self.phase
    }

    pub fn card_status(&self, index: usize) -> Option<CardStatus> {
        self.card_status.get(index).copied()
    }

    pub fn statuses(&self) -> &[CardStatus] {
        &self.card_status
    }

    /// Indices of the revealed, unresolved cards in selection order.
    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn matched_count(&self) -> usize {
        self.matched
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Compares the two buffered cards and clears the buffer. Equal
    /// orientations become matched, anything else flips back to hidden.
    fn resolve_pending<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> Feedback {
        let (first, second) = match self.selection.as_slice() {
            &[first, second] => (first, second),
            _ => return Feedback::Ignored,
        };
        self.selection.clear();

        if !angular_equal(self.layout.cells[first], self.layout.cells[second]) {
            self.card_status[first] = CardStatus::Hidden;
            self.card_status[second] = CardStatus::Hidden;
            self.phase = PairPhase::AwaitingSelection;
            return self.emit(Feedback::NoMatch);
        }

        self.card_status[first] = CardStatus::Matched;
        self.card_status[second] = CardStatus::Matched;
        self.matched += 2;

        let total = self.layout.cells.len();
        if self.matched < total {
            self.phase = PairPhase::AwaitingSelection;
            return self.emit(Feedback::MatchFound {
                matched: self.matched,
                total,
            });
        }

        self.round = self.round.saturating_add(1);
        self.phase = PairPhase::RoundComplete;
        scheduler.after(
            self.generator.config().advance_delay(),
            ScheduledEvent::new(self.generation, DeferredAction::AdvanceRound),
        );
        tracing::info!(next_round = self.round, "all pairs matched");
        self.emit(Feedback::RoundComplete { round: self.round })
    }

    fn deal(&mut self) {
        self.layout = self.generator.new_round(self.round, &mut self.rng);
        self.card_status = vec![CardStatus::Hidden; self.layout.cells.len()];
        self.selection.clear();
        self.matched = 0;
        self.phase = PairPhase::AwaitingSelection;
        self.generation = self.generation.next();
        tracing::debug!(
            round = self.round,
            generation = self.generation.value(),
            cells = self.layout.cells.len(),
            "pairs round dealt"
        );
    }

    fn emit(&mut self, feedback: Feedback) -> Feedback {
        if feedback.is_effective() {
            self.journal.record(self.round, self.generation, feedback);
        }
        feedback
    }
}

impl<R: Rng> Session for Mode2Session<R> {
    fn mode(&self) -> GameMode {
        GameMode::PairMatch
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
        match self.card_status.get(index) {
            Some(CardStatus::Hidden) => {}
            _ => return Feedback::Ignored,
        }
        if self.selection.len() >= 2 || self.selection.contains(&index) {
            return Feedback::Ignored;
        }

        self.card_status[index] = CardStatus::Selected;
        self.selection.push(index);
        if self.selection.len() < 2 {
            return self.emit(Feedback::Selected);
        }

        self.phase = PairPhase::Revealing;
        scheduler.after(
            self.generator.config().reveal_delay(),
            ScheduledEvent::new(self.generation, DeferredAction::ResolvePair),
        );
        self.emit(Feedback::PairPending)
    }

    fn fire<S: Scheduler + ?Sized>(
        &mut self,
        event: ScheduledEvent,
        scheduler: &mut S,
    ) -> Feedback {
        if event.generation != self.generation {
            tracing::debug!(
                event = event.generation.value(),
                current = self.generation.value(),
                "discarding stale pairs event"
            );
            return Feedback::Stale;
        }
        match (event.action, self.phase) {
            (DeferredAction::ResolvePair, PairPhase::Revealing) => self.resolve_pending(scheduler),
            (DeferredAction::AdvanceRound, PairPhase::RoundComplete) => {
                self.deal();
                self.emit(Feedback::RoundStarted { round: self.round })
            }
            _ => Feedback::Ignored,
        }
    }

    fn restart(&mut self) -> Feedback {
        self.round = 1;
        self.deal();
        self.emit(Feedback::RoundStarted { round: self.round })
    }
}
