//! Error types for calendar synthesis and its collaborators

use std::fmt;
use std::path::PathBuf;

/// Main error type for all synthesis operations
#[derive(Debug)]
pub enum SynthesisError {
    /// Sample matrix does not match the calendar dimensions
    InputDimension {
        /// Required (rows, columns)
        expected: (usize, usize),
        /// Provided (rows, columns)
        actual: (usize, usize),
    },

    /// A history record could not be parsed or placed on the calendar
    HistoryParse {
        /// Zero-based index of the offending record, when one can be named
        entry: Option<usize>,
        /// Description of what is wrong with the record
        reason: String,
    },

    /// The ledger sink rejected an increment event
    ///
    /// The grid still holds the value from before the rejected event.
    EmissionSink {
        /// Row of the rejected event
        row: usize,
        /// Column of the rejected event
        column: usize,
        /// Count the event would have produced
        value: u32,
        /// Failure reported by the sink
        source: Box<Self>,
    },

    /// Failed to load the target image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a preview image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// An external program exited unsuccessfully
    Command {
        /// Program that was run
        program: &'static str,
        /// Arguments passed to the program
        arguments: String,
        /// Exit status and captured diagnostics
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputDimension { expected, actual } => {
                write!(
                    f,
                    "Sample matrix is {}x{} but the calendar needs {}x{} (rows x columns)",
                    actual.0, actual.1, expected.0, expected.1
                )
            }
            Self::HistoryParse { entry, reason } => match entry {
                Some(index) => write!(f, "Invalid history record #{index}: {reason}"),
                None => write!(f, "Invalid history data: {reason}"),
            },
            Self::EmissionSink {
                row,
                column,
                value,
                source,
            } => {
                write!(
                    f,
                    "Ledger rejected increment ({row}, {column}) -> {value}: {source}"
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Command {
                program,
                arguments,
                reason,
            } => {
                write!(f, "Command '{program} {arguments}' failed: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
        }
    }
}

impl std::error::Error for SynthesisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::EmissionSink { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Convenience type alias for synthesis results
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SynthesisError {
    SynthesisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a history parse error, optionally naming the record index
pub fn history_error(entry: Option<usize>, reason: &impl ToString) -> SynthesisError {
    SynthesisError::HistoryParse {
        entry,
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to a path and operation
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> SynthesisError {
    SynthesisError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
