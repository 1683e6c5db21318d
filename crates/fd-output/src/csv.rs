//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `courier_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;
use tracing::debug;

use crate::writer::OutputWriter;
use crate::{CourierSnapshotRow, OutputResult, TickSummaryRow};

pub const SNAPSHOT_FILE: &str = "courier_snapshots.csv";
pub const SUMMARY_FILE: &str = "tick_summaries.csv";

pub const SNAPSHOT_HEADER: [&str; 10] =
    ["tick", "day", "minute", "courier_id", "state", "x", "y", "anchor", "on_edge", "order_id"];
pub const SUMMARY_HEADER: [&str; 11] = [
    "tick",
    "day",
    "minute",
    "wall_ms",
    "orders_created",
    "assigned",
    "picked_up",
    "delivered",
    "failed",
    "pending",
    "couriers",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open both files, and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join(SNAPSHOT_FILE))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record(SUMMARY_HEADER)?;

        debug!(dir = %dir.display(), "csv output opened");
        Ok(Self {
            snapshots,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[CourierSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.day.to_string(),
                row.minute.to_string(),
                row.courier_id.to_string(),
                row.state.to_string(),
                format!("{:.2}", row.x),
                format!("{:.2}", row.y),
                row.anchor.to_string(),
                (row.on_edge as u8).to_string(),
                row.order_id.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.day.to_string(),
            row.minute.to_string(),
            format!("{:.1}", row.wall_ms),
            row.orders_created.to_string(),
            row.assigned.to_string(),
            row.picked_up.to_string(),
            row.delivered.to_string(),
            row.failed.to_string(),
            row.pending.to_string(),
            row.couriers.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
