//! Session event journal.
//!
//! Each session keeps a bounded, in-memory journal of the feedback it
//! produced. Nothing is written to disk unless a caller asks for it through
//! [`EventJournal::write_jsonl`]; the journal is a trace, not saved state.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::session::{Feedback, GameMode, Generation};

/// Entries retained by [`EventJournal::default_for`].
pub const DEFAULT_JOURNAL_CAPACITY: usize = 256;

fn append_json_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    writer.write_all(b"\n")
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub sequence: usize,
    pub mode: GameMode,
    pub round: u32,
    pub generation: u64,
    pub feedback: Feedback,
    pub timestamp_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventJournal {
    mode: GameMode,
    capacity: usize,
    sequence: usize,
    entries: VecDeque<JournalEntry>,
}

impl EventJournal {
    pub fn new(mode: GameMode, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            mode,
            capacity,
            sequence: 0,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn default_for(mode: GameMode) -> Self {
        Self::new(mode, DEFAULT_JOURNAL_CAPACITY)
    }

    /// Appends an entry, dropping the oldest once full.
    pub fn record(&mut self, round: u32, generation: Generation, feedback: Feedback) {
        self.sequence += 1;
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            sequence: self.sequence,
            mode: self.mode,
            round,
            generation: generation.value(),
            feedback,
            timestamp_ms: timestamp_now(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends retained entries to `path` as JSON lines.
    pub fn write_jsonl<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for entry in &self.entries {
            append_json_line(&mut file, entry)?;
        }
        Ok(())
    }
}

pub fn timestamp_now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_records_sequence_in_order() {
        let mut journal = EventJournal::new(GameMode::PairMatch, 3);
        for round in 1..=5 {
            journal.record(round, Generation::default(), Feedback::NoMatch);
        }
        let sequences: Vec<usize> = journal.entries().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![3, 4, 5]);
        assert_eq!(journal.len(), 3);
        assert_eq!(journal.last().map(|e| e.round), Some(5));
    }

    #[test]
    fn writes_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("session.jsonl");
        let mut journal = EventJournal::default_for(GameMode::TargetMatch);
        journal.record(1, Generation::default(), Feedback::Incorrect);
        journal.record(1, Generation::default(), Feedback::Correct { score: 10, round: 2 });
        journal.write_jsonl(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["mode"], "targetMatch");
        assert_eq!(second["feedback"]["kind"], "correct");
        assert_eq!(second["feedback"]["score"], 10);
    }
}
