//! Input/output operations, configuration and error handling

/// Command-line interface and pipeline orchestration
pub mod cli;
/// Calendar constants and runtime defaults
pub mod configuration;
/// Error types and constructors
pub mod error;
/// Target image loading and PNG previews
pub mod image;
/// Ledger sinks recording increment events
pub mod ledger;
/// Progress observers
pub mod progress;
/// Text renderings of the calendar
pub mod render;
