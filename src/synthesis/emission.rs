//! Ordered emission of unit increments
//!
//! Cells are visited week by week and day by day within a week, so the dates handed
//! to the ledger never go backwards. Each event is offered to the sink before the
//! grid is advanced: after a failure the grid shows exactly the accepted events.

use crate::calendar::grid::{GridState, IncrementEvent, traversal_order};
use crate::io::configuration::{CALENDAR_COLUMNS, CALENDAR_ROWS};
use crate::io::error::{Result, SynthesisError};
use crate::io::ledger::LedgerSink;
use crate::io::progress::ProgressObserver;

/// Totals reported once emission stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmissionReport {
    /// Increments recorded by this driver
    pub emitted: u64,
    /// Increments applied since the baseline, including earlier runs
    pub completed: u64,
    /// Increments needed from baseline to target
    pub total: u64,
}

/// Steps a grid from its current counts to its targets one increment at a time
pub struct EmissionDriver<'g> {
    grid: &'g mut GridState,
    cursor: usize,
    emitted: u64,
    completed: u64,
    total: u64,
}

impl<'g> EmissionDriver<'g> {
    /// Prepare to emit the increments still pending on `grid`
    pub fn new(grid: &'g mut GridState) -> Self {
        let total = grid.total_increments();
        let completed = grid.applied_increments();
        Self {
            grid,
            cursor: 0,
            emitted: 0,
            completed,
            total,
        }
    }

    /// Increments applied since the baseline
    pub const fn completed(&self) -> u64 {
        self.completed
    }

    /// Increments needed from baseline to target
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Read access to the grid being driven
    pub fn grid(&self) -> &GridState {
        &*self.grid
    }

    const fn position_at(cursor: usize) -> [usize; 2] {
        [cursor % CALENDAR_ROWS, cursor / CALENDAR_ROWS]
    }

    /// The event the next step would emit, without emitting it
    pub fn peek(&mut self) -> Option<IncrementEvent> {
        while self.cursor < CALENDAR_ROWS * CALENDAR_COLUMNS {
            if let Some(event) = self.grid.next_increment(Self::position_at(self.cursor)) {
                return Some(event);
            }
            self.cursor += 1;
        }
        None
    }

    /// Record one increment and advance its cell
    ///
    /// Returns `None` once every cell has reached its target. Callers that support
    /// cancellation check between steps.
    ///
    /// # Errors
    ///
    /// Returns `EmissionSink` if the sink rejects the event; the grid is left as it
    /// was before the step
    pub fn step<S>(&mut self, sink: &mut S) -> Result<Option<IncrementEvent>>
    where
        S: LedgerSink + ?Sized,
    {
        let Some(event) = self.peek() else {
            return Ok(None);
        };

        sink.record(&event)
            .map_err(|source| SynthesisError::EmissionSink {
                row: event.row,
                column: event.column,
                value: event.value,
                source: Box::new(source),
            })?;
        self.grid.apply(&event)?;

        self.emitted += 1;
        self.completed += 1;
        Ok(Some(event))
    }

    /// Emit every pending increment, reporting progress after each one
    ///
    /// # Errors
    ///
    /// Returns `EmissionSink` on the first rejected event
    pub fn run<S, O>(&mut self, sink: &mut S, observer: &mut O) -> Result<EmissionReport>
    where
        S: LedgerSink + ?Sized,
        O: ProgressObserver + ?Sized,
    {
        while self.step(sink)?.is_some() {
            observer.on_progress(self.completed, self.total);
        }
        Ok(self.report())
    }

    /// Totals so far
    pub const fn report(&self) -> EmissionReport {
        EmissionReport {
            emitted: self.emitted,
            completed: self.completed,
            total: self.total,
        }
    }
}

/// Drive `grid` to its targets through `sink`
///
/// # Errors
///
/// Returns `EmissionSink` on the first rejected event
pub fn emit<S, O>(grid: &mut GridState, sink: &mut S, observer: &mut O) -> Result<EmissionReport>
where
    S: LedgerSink + ?Sized,
    O: ProgressObserver + ?Sized,
{
    let mut driver = EmissionDriver::new(grid);
    let report = driver.run(sink, observer)?;
    tracing::info!(
        emitted = report.emitted,
        total = report.total,
        "emission complete"
    );
    Ok(report)
}

/// List the events emission would produce, leaving the grid untouched
pub fn plan_events(grid: &GridState) -> impl Iterator<Item = IncrementEvent> + '_ {
    traversal_order().flat_map(move |position| {
        let pending = match (grid.date(position), grid.current(position), grid.target(position)) {
            (Some(date), Some(current), Some(target)) if current < target => {
                Some((date, current + 1..=target))
            }
            _ => None,
        };
        pending.into_iter().flat_map(move |(date, values)| {
            values.map(move |value| IncrementEvent {
                row: position[0],
                column: position[1],
                date,
                value,
            })
        })
    })
}
