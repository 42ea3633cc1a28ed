//! Dense calendar grid holding baseline, current and target activity counts
//!
//! Every slot of the 7×54 calendar is backed by parallel `ndarray` matrices indexed
//! by `[row, column]`. Slots without a date are inert: they carry no counts and are
//! skipped by every traversal. The inert state is tracked by a bitmask so that
//! iteration over active cells never touches the count matrices.

use bitvec::bitvec;
use bitvec::vec::BitVec;
use chrono::NaiveDate;
use ndarray::Array2;

use crate::io::configuration::{CALENDAR_COLUMNS, CALENDAR_ROWS};
use crate::io::error::{Result, invalid_parameter};

/// Which count series of a cell to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKind {
    /// Activity recorded before the run started
    Baseline,
    /// Activity including every increment applied so far
    Current,
    /// Activity the run is driving towards
    Target,
}

/// One atomic +1 step applied to a cell's current count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementEvent {
    /// Weekday row of the cell (Sunday = 0)
    pub row: usize,
    /// Week column of the cell
    pub column: usize,
    /// Calendar date the cell represents
    pub date: NaiveDate,
    /// Current count of the cell once this event is applied
    pub value: u32,
}

impl IncrementEvent {
    /// Grid position of the incremented cell
    pub const fn position(&self) -> [usize; 2] {
        [self.row, self.column]
    }
}

/// Calendar-ordered positions: ascending column, then ascending row within a column
pub fn traversal_order() -> impl Iterator<Item = [usize; 2]> {
    (0..CALENDAR_COLUMNS).flat_map(|column| (0..CALENDAR_ROWS).map(move |row| [row, column]))
}

/// Calendar grid with per-cell dates and counts
#[derive(Debug, Clone)]
pub struct GridState {
    dates: Array2<Option<NaiveDate>>,
    baseline: Array2<u32>,
    current: Array2<u32>,
    target: Array2<u32>,
    /// Set bits mark cells that have a date, indexed row-major
    active: BitVec,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

impl GridState {
    /// Create a grid where every cell is inert
    pub fn new() -> Self {
        let shape = (CALENDAR_ROWS, CALENDAR_COLUMNS);
        Self {
            dates: Array2::from_elem(shape, None),
            baseline: Array2::zeros(shape),
            current: Array2::zeros(shape),
            target: Array2::zeros(shape),
            active: bitvec![0; CALENDAR_ROWS * CALENDAR_COLUMNS],
        }
    }

    /// Get the number of rows in the grid
    pub const fn rows(&self) -> usize {
        CALENDAR_ROWS
    }

    /// Get the number of columns in the grid
    pub const fn cols(&self) -> usize {
        CALENDAR_COLUMNS
    }

    const fn flat_index(position: [usize; 2]) -> Option<usize> {
        if position[0] < CALENDAR_ROWS && position[1] < CALENDAR_COLUMNS {
            Some(position[0] * CALENDAR_COLUMNS + position[1])
        } else {
            None
        }
    }

    /// Give a cell a date and a baseline count, making it active
    ///
    /// Current and target both start at the baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if the position lies outside the calendar or the cell is
    /// already active
    pub fn activate(&mut self, position: [usize; 2], date: NaiveDate, baseline: u32) -> Result<()> {
        let index = Self::flat_index(position)
            .ok_or_else(|| invalid_parameter("position", &format!("{position:?}"), &"outside calendar"))?;
        if self.is_active(position) {
            return Err(invalid_parameter(
                "position",
                &format!("{position:?}"),
                &"cell already holds a date",
            ));
        }

        self.active.set(index, true);
        if let Some(slot) = self.dates.get_mut(position) {
            *slot = Some(date);
        }
        for counts in [&mut self.baseline, &mut self.current, &mut self.target] {
            if let Some(slot) = counts.get_mut(position) {
                *slot = baseline;
            }
        }
        Ok(())
    }

    /// Test whether a cell has a date and takes part in synthesis
    pub fn is_active(&self, position: [usize; 2]) -> bool {
        Self::flat_index(position)
            .is_some_and(|index| self.active.get(index).as_deref() == Some(&true))
    }

    /// Number of active cells
    pub fn active_count(&self) -> usize {
        self.active.count_ones()
    }

    /// Active positions in calendar order
    pub fn active_positions(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        traversal_order().filter(|&position| self.is_active(position))
    }

    /// Date of an active cell
    pub fn date(&self, position: [usize; 2]) -> Option<NaiveDate> {
        self.dates.get(position).copied().flatten()
    }

    /// Read one count series of an active cell
    pub fn count(&self, position: [usize; 2], kind: CountKind) -> Option<u32> {
        if !self.is_active(position) {
            return None;
        }
        let counts = match kind {
            CountKind::Baseline => &self.baseline,
            CountKind::Current => &self.current,
            CountKind::Target => &self.target,
        };
        counts.get(position).copied()
    }

    /// Baseline count of an active cell
    pub fn baseline(&self, position: [usize; 2]) -> Option<u32> {
        self.count(position, CountKind::Baseline)
    }

    /// Current count of an active cell
    pub fn current(&self, position: [usize; 2]) -> Option<u32> {
        self.count(position, CountKind::Current)
    }

    /// Target count of an active cell
    pub fn target(&self, position: [usize; 2]) -> Option<u32> {
        self.count(position, CountKind::Target)
    }

    /// Set the target of an active cell
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is inert or the target lies below the current
    /// count, since counts can never be lowered
    pub fn set_target(&mut self, position: [usize; 2], target: u32) -> Result<()> {
        let current = self.current(position).ok_or_else(|| {
            invalid_parameter("position", &format!("{position:?}"), &"cell is inert")
        })?;
        if target < current {
            return Err(invalid_parameter(
                "target",
                &target,
                &format!("below current count {current} at {position:?}"),
            ));
        }
        if let Some(slot) = self.target.get_mut(position) {
            *slot = target;
        }
        Ok(())
    }

    /// The increment that would advance a cell by one, if it is below target
    pub fn next_increment(&self, position: [usize; 2]) -> Option<IncrementEvent> {
        let current = self.current(position)?;
        let target = self.target(position)?;
        let date = self.date(position)?;
        (current < target).then(|| IncrementEvent {
            row: position[0],
            column: position[1],
            date,
            value: current + 1,
        })
    }

    /// Apply an increment event to the cell it names
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not advance its cell by exactly one or
    /// would carry the cell past its target
    pub fn apply(&mut self, event: &IncrementEvent) -> Result<()> {
        let position = event.position();
        if self.next_increment(position).as_ref() != Some(event) {
            return Err(invalid_parameter(
                "event",
                &format!("({}, {}) -> {}", event.row, event.column, event.value),
                &"does not follow the cell's current count",
            ));
        }
        if let Some(slot) = self.current.get_mut(position) {
            *slot = event.value;
        }
        Ok(())
    }

    /// Sum of a per-cell difference between two count series over active cells
    fn sum_difference(&self, upper: CountKind, lower: CountKind) -> u64 {
        self.active_positions()
            .map(|position| {
                let high = self.count(position, upper).unwrap_or(0);
                let low = self.count(position, lower).unwrap_or(0);
                u64::from(high.saturating_sub(low))
            })
            .sum()
    }

    /// Increments needed to take every cell from baseline to target
    pub fn total_increments(&self) -> u64 {
        self.sum_difference(CountKind::Target, CountKind::Baseline)
    }

    /// Increments already applied since the baseline
    pub fn applied_increments(&self) -> u64 {
        self.sum_difference(CountKind::Current, CountKind::Baseline)
    }

    /// Increments still needed to reach every target
    pub fn pending_increments(&self) -> u64 {
        self.sum_difference(CountKind::Target, CountKind::Current)
    }

    /// Largest count of a series over active cells
    pub fn max_count(&self, kind: CountKind) -> u32 {
        self.active_positions()
            .filter_map(|position| self.count(position, kind))
            .max()
            .unwrap_or(0)
    }
}
