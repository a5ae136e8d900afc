#![deny(warnings)]

//! Run telemetry and save files.
//!
//! Telemetry is line-delimited JSON: one record per resolved day and a
//! final summary record, tagged by a `type` field so downstream tooling
//! can split them with a one-line filter. Saves are bincode snapshots of
//! the whole [`GameState`] aggregate.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use siege_core::{DailyReport, GameState, ResolutionEntry, ResourceKind};
use siege_runtime::RunStatus;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Everything the telemetry stream captures about one resolved day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u32,
    pub date: NaiveDate,
    pub population: u32,
    pub healthy: u32,
    pub guards: u32,
    pub sick: u32,
    pub wounded: u32,
    pub elderly: u32,
    pub resources: BTreeMap<ResourceKind, u32>,
    pub morale: u32,
    pub unrest: u32,
    pub siege_intensity: f64,
    pub entries: Vec<ResolutionEntry>,
}

impl DayRecord {
    /// Capture the post-resolution state alongside the day's report.
    pub fn capture(state: &GameState, report: &DailyReport) -> Self {
        Self {
            day: report.day,
            date: report.date,
            population: state.population.total_population(),
            healthy: state.population.healthy_workers(),
            guards: state.population.guards(),
            sick: state.population.sick_workers(),
            wounded: state.population.wounded_workers(),
            elderly: state.population.elderly(),
            resources: state.resources.snapshot(),
            morale: state.morale,
            unrest: state.unrest,
            siege_intensity: state.siege.intensity,
            entries: report.entries().to_vec(),
        }
    }
}

/// Closing record of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub scenario: String,
    pub seed: u64,
    pub days_survived: u32,
    pub status: RunStatus,
    pub final_population: u32,
    pub zones_lost: u32,
    pub final_resources: BTreeMap<ResourceKind, u32>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TelemetryLine<'a> {
    Day(&'a DayRecord),
    Summary(&'a RunSummary),
}

/// Line-delimited JSON sink for a run's telemetry.
pub struct TelemetryWriter<W: Write> {
    out: W,
}

impl TelemetryWriter<BufWriter<File>> {
    /// Create (or truncate) the telemetry file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("creating telemetry file {}", path.as_ref().display()))?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> TelemetryWriter<W> {
    /// Wrap any writer; used by tests with an in-memory buffer.
    pub fn from_writer(out: W) -> Self {
        Self { out }
    }

    fn write_line(&mut self, line: &TelemetryLine<'_>) -> Result<()> {
        let text = serde_json::to_string(line).context("serializing telemetry record")?;
        writeln!(self.out, "{}", text).context("writing telemetry record")?;
        Ok(())
    }

    /// Append one day record.
    pub fn record_day(&mut self, record: &DayRecord) -> Result<()> {
        self.write_line(&TelemetryLine::Day(record))
    }

    /// Append the summary record, flush, and return the inner writer.
    pub fn finish(mut self, summary: &RunSummary) -> Result<W> {
        self.write_line(&TelemetryLine::Summary(summary))?;
        self.out.flush().context("flushing telemetry")?;
        info!(days = summary.days_survived, "telemetry finished");
        Ok(self.out)
    }
}

/// Write a bincode snapshot of the full aggregate.
pub fn save_snapshot(path: impl AsRef<Path>, state: &GameState) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("creating save file {}", path.as_ref().display()))?;
    bincode::serialize_into(BufWriter::new(file), state).context("encoding snapshot")?;
    info!(path = %path.as_ref().display(), day = state.day, "snapshot saved");
    Ok(())
}

/// Load a bincode snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<GameState> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("opening save file {}", path.as_ref().display()))?;
    let state = bincode::deserialize_from(BufReader::new(file)).context("decoding snapshot")?;
    Ok(state)
}
