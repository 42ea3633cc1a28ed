//! Text renderings of the calendar: ASCII preview, count tables and the data listing

use crate::calendar::grid::{CountKind, GridState, traversal_order};
use crate::io::configuration::{ASCII_BLANK, ASCII_PALETTE, SHORT_DATE_FORMAT};
use crate::synthesis::scale::ScaleResolution;

/// Draw the calendar with one character per cell, one line per weekday row
///
/// Inert cells and cells with no activity are blank; every other cell shows the
/// palette character of the display bin its count falls in.
pub fn ascii_image(grid: &GridState, resolution: &ScaleResolution, kind: CountKind) -> String {
    let mut out = String::with_capacity(grid.rows() * (grid.cols() + 1));
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let glyph = grid
                .count([row, col], kind)
                .and_then(|count| resolution.display_bin(count))
                .and_then(|bin| ASCII_PALETTE.get(usize::from(bin)).copied())
                .unwrap_or(ASCII_BLANK);
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Tabulate one count series with right-aligned four-character cells
///
/// Inert cells are shown as `-`.
pub fn count_table(grid: &GridState, kind: CountKind) -> String {
    let mut out = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = grid
                .count([row, col], kind)
                .map_or_else(|| "-".to_string(), |count| count.to_string());
            out.push_str(&format!("{cell:>4}"));
        }
        out.push('\n');
    }
    out
}

/// List the activity added so far, one `yyyyMMdd delta` line per changed day
///
/// Lines follow calendar order.
pub fn calendar_data(grid: &GridState) -> String {
    let mut out = String::new();
    for position in traversal_order() {
        let (Some(date), Some(baseline), Some(current)) = (
            grid.date(position),
            grid.baseline(position),
            grid.current(position),
        ) else {
            continue;
        };
        let added = current.saturating_sub(baseline);
        if added > 0 {
            out.push_str(&format!("{} {added}\n", date.format(SHORT_DATE_FORMAT)));
        }
    }
    out
}
