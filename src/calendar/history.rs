//! Historical activity loading and placement onto the calendar grid

use std::path::{Path, PathBuf};

use chrono::{Datelike, Days, NaiveDate};
use serde::Deserialize;

use crate::calendar::grid::GridState;
use crate::io::configuration::{CALENDAR_COLUMNS, CALENDAR_ROWS, HISTORY_DATE_FORMATS};
use crate::io::error::{Result, file_system_error, history_error};

/// Activity count recorded for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Day the activity was recorded on
    pub date: NaiveDate,
    /// Number of activity units on that day
    pub count: u32,
}

/// Supplies the activity history the synthesized calendar builds on
pub trait HistorySource {
    /// Load every recorded day
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or parsed
    fn records(&self) -> Result<Vec<HistoryRecord>>;
}

impl HistorySource for [HistoryRecord] {
    fn records(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.to_vec())
    }
}

impl HistorySource for Vec<HistoryRecord> {
    fn records(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.clone())
    }
}

/// Contributions calendar data saved to a local file
#[derive(Debug, Clone)]
pub struct CalendarDataFile {
    path: PathBuf,
}

impl CalendarDataFile {
    /// Refer to a calendar data file without reading it yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySource for CalendarDataFile {
    fn records(&self) -> Result<Vec<HistoryRecord>> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| file_system_error(&self.path, "read history", e))?;
        parse_calendar_data(&text)
    }
}

// Counts arrive either as JSON numbers or as strings wrapping the digits
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
struct RawEntry(String, RawCount);

/// Parse a calendar date in any of the accepted history formats
///
/// # Errors
///
/// Returns an error if the text matches none of the accepted formats
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    match_date(text).ok_or_else(|| history_error(None, &format!("unrecognized date '{text}'")))
}

fn match_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim().trim_matches('"');
    HISTORY_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

fn parse_count(raw: RawCount, entry: usize) -> Result<u32> {
    let value = match raw {
        RawCount::Number(number) => number,
        RawCount::Text(text) => {
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            digits
                .parse::<u64>()
                .map_err(|e| history_error(Some(entry), &format!("count '{text}': {e}")))?
        }
    };
    u32::try_from(value).map_err(|e| history_error(Some(entry), &format!("count {value}: {e}")))
}

/// Parse contributions calendar data: a JSON array of `[date, count]` pairs
///
/// # Errors
///
/// Returns an error if the text is not such an array, or any date or count in it is
/// malformed
pub fn parse_calendar_data(text: &str) -> Result<Vec<HistoryRecord>> {
    let entries: Vec<RawEntry> =
        serde_json::from_str(text).map_err(|e| history_error(None, &e))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, RawEntry(date, count))| {
            let date = match_date(&date).ok_or_else(|| {
                history_error(Some(index), &format!("unrecognized date '{date}'"))
            })?;
            let count = parse_count(count, index)?;
            Ok(HistoryRecord { date, count })
        })
        .collect()
}

/// Place history records on a fresh calendar grid
///
/// The earliest record's weekday selects its row (Sunday = 0); every other record is
/// placed by the whole weeks elapsed since the Sunday that starts the earliest
/// record's week. Days without a record stay inert.
///
/// # Errors
///
/// Returns an error if two records share a date or a record falls outside the
/// calendar window
pub fn build_grid(records: &[HistoryRecord]) -> Result<GridState> {
    let mut grid = GridState::new();

    let mut ordered: Vec<(usize, &HistoryRecord)> = records.iter().enumerate().collect();
    ordered.sort_by_key(|(_, record)| record.date);

    let Some((_, first)) = ordered.first() else {
        tracing::warn!("history is empty, every calendar cell is inert");
        return Ok(grid);
    };

    let lead = u64::from(first.date.weekday().num_days_from_sunday());
    let origin = first
        .date
        .checked_sub_days(Days::new(lead))
        .ok_or_else(|| history_error(None, &"calendar start precedes representable dates"))?;

    for &(entry, record) in &ordered {
        let elapsed = usize::try_from(record.date.signed_duration_since(origin).num_days())
            .map_err(|e| history_error(Some(entry), &e))?;
        let position = [elapsed % CALENDAR_ROWS, elapsed / CALENDAR_ROWS];
        if position[1] >= CALENDAR_COLUMNS {
            return Err(history_error(
                Some(entry),
                &format!(
                    "{} is more than {CALENDAR_COLUMNS} weeks after {origin}",
                    record.date
                ),
            ));
        }
        if grid.is_active(position) {
            return Err(history_error(
                Some(entry),
                &format!("duplicate date {}", record.date),
            ));
        }
        grid.activate(position, record.date, record.count)?;
    }

    tracing::debug!(
        records = records.len(),
        first = %first.date,
        "placed history on calendar"
    );
    Ok(grid)
}
