//! Unit tests mirroring the `src/` tree, one file per source module

mod io;

use chrono::{Days, NaiveDate};
use contribsynth::calendar::history::HistoryRecord;
use contribsynth::io::configuration::{CALENDAR_COLUMNS, CALENDAR_ROWS};
use ndarray::Array2;

/// A Sunday, so the calendar built from it starts at row 0
fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

/// Date that lands at `[row, column]` when the history starts at `origin()`
fn date_at(position: [usize; 2]) -> NaiveDate {
    let offset = position[1] * CALENDAR_ROWS + position[0];
    origin().checked_add_days(Days::new(offset as u64)).unwrap()
}

/// One record per calendar slot, every count produced by `count_at`
fn full_history(count_at: impl Fn([usize; 2]) -> u32) -> Vec<HistoryRecord> {
    (0..CALENDAR_COLUMNS)
        .flat_map(|column| (0..CALENDAR_ROWS).map(move |row| [row, column]))
        .map(|position| HistoryRecord {
            date: date_at(position),
            count: count_at(position),
        })
        .collect()
}

/// Calendar-shaped samples, every pixel produced by `gray_at`
fn samples(gray_at: impl Fn([usize; 2]) -> u8) -> Array2<u8> {
    Array2::from_shape_fn((CALENDAR_ROWS, CALENDAR_COLUMNS), |(row, column)| {
        gray_at([row, column])
    })
}
