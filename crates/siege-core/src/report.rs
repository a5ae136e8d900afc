//! The daily resolution report consumed by rendering and telemetry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category tag attached to every report entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryTag {
    Production,
    Consumption,
    Recovery,
    Casualty,
    Trade,
    OrderEffect,
    Diplomacy,
    Siege,
}

/// One titled group of report lines, e.g. everything the trading post did
/// today.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEntry {
    pub title: String,
    pub tag: EntryTag,
    pub lines: Vec<String>,
}

impl ResolutionEntry {
    pub fn new(title: impl Into<String>, tag: EntryTag) -> Self {
        Self {
            title: title.into(),
            tag,
            lines: Vec::new(),
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Ordered entries for one simulated day. Entries without lines are
/// dropped on insertion, so an idle subsystem leaves no trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub day: u32,
    pub date: NaiveDate,
    entries: Vec<ResolutionEntry>,
}

impl DailyReport {
    pub fn new(day: u32, date: NaiveDate) -> Self {
        Self {
            day,
            date,
            entries: Vec::new(),
        }
    }

    /// Append `entry` unless it has no lines.
    pub fn push(&mut self, entry: ResolutionEntry) {
        if !entry.is_empty() {
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[ResolutionEntry] {
        &self.entries
    }

    pub fn line_count(&self) -> usize {
        self.entries.iter().map(|e| e.lines.len()).sum()
    }
}
