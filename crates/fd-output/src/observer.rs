//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use fd_core::{OrderId, SimClock, SimConfig};
use fd_courier::Fleet;
use fd_graph::Graph;
use fd_sim::{SimObserver, SimStats, TickReport};

use crate::row::{CourierSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes courier snapshots and tick summaries to any
/// [`OutputWriter`].
///
/// `SimObserver` methods have no return value, so the first writer error is
/// stored and later writes are still attempted.  Check
/// [`take_error`][Self::take_error] after `sim.run()` returns.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:           W,
    tick_duration_ms: f64,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// `config` supplies the pace used for the `wall_ms` column.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_duration_ms: config.tick_duration_ms(),
            last_error:       None,
        }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if self.last_error.is_none() {
            self.last_error = result.err();
        }
    }
}

fn snapshot_rows(clock: &SimClock, fleet: &Fleet, graph: &Graph) -> OutputResult<Vec<CourierSnapshotRow>> {
    fleet
        .iter()
        .map(|c| {
            let at = c.point(graph)?;
            Ok(CourierSnapshotRow {
                tick:       clock.tick.0,
                day:        clock.day_count,
                minute:     clock.minute_of_day,
                courier_id: c.id.0,
                state:      c.state.as_str(),
                x:          at.x,
                y:          at.y,
                anchor:     c.anchor().0,
                on_edge:    c.position.is_on_edge(),
                order_id:   c.job.map_or(OrderId::INVALID.0, |j| j.order.0),
            })
        })
        .collect()
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, clock: &SimClock, report: &TickReport) {
        let row = TickSummaryRow {
            tick:           report.tick.0,
            day:            report.day_count,
            minute:         report.minute_of_day,
            wall_ms:        clock.tick.0 as f64 * self.tick_duration_ms,
            orders_created: report.orders_created as u64,
            assigned:       report.assigned as u64,
            picked_up:      report.picked_up as u64,
            delivered:      report.delivered as u64,
            failed:         report.failed as u64,
            pending:        report.pending as u64,
            couriers:       report.couriers as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, clock: &SimClock, fleet: &Fleet, graph: &Graph) {
        let result = snapshot_rows(clock, fleet, graph).and_then(|rows| {
            if rows.is_empty() {
                Ok(())
            } else {
                self.writer.write_snapshots(&rows)
            }
        });
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _stats: &SimStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
