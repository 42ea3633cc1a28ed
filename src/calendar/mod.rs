//! Calendar data structures
//!
//! This module contains the calendar-side model:
//! - The dense 7×54 grid of per-day counts
//! - Loading activity history and placing it on the grid

/// Calendar grid state and increment events
pub mod grid;
/// Activity history parsing and placement
pub mod history;

pub use grid::{GridState, IncrementEvent};
