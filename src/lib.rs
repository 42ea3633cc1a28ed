//! Contribution calendar synthesis from a target image
//!
//! The calendar is a fixed 7×54 grid of days. Given the activity already recorded on
//! each day and an image quantized to four intensity levels, the crate computes the
//! smallest bin width that keeps every existing count renderable, assigns each day
//! the fewest extra units that make it render at its desired level, and emits those
//! units one dated increment at a time to a ledger.

#![forbid(unsafe_code)]

/// Calendar grid model and historical activity placement
pub mod calendar;
/// Input/output: CLI, configuration, errors, images, ledgers, progress and rendering
pub mod io;
/// Quantization, scale resolution, target assignment and increment emission
pub mod synthesis;

pub use io::error::{Result, SynthesisError};
