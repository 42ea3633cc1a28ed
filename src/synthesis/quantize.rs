//! Grayscale quantization into calendar intensity levels

use std::fmt;

use ndarray::Array2;

use crate::io::configuration::{CALENDAR_COLUMNS, CALENDAR_ROWS, GRAY_BAND_WIDTH, INTENSITY_LEVELS};
use crate::io::error::{Result, SynthesisError};

/// Desired darkness of a calendar cell
///
/// Level 0 asks for the most activity (darkest tile) and level 3 for the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntensityLevel(u8);

impl IntensityLevel {
    /// Darkest level, demanding the most activity
    pub const DARKEST: Self = Self(0);
    /// Lightest level, demanding the least activity
    pub const LIGHTEST: Self = Self(INTENSITY_LEVELS - 1);

    /// Wrap a raw level, rejecting values outside 0..=3
    pub const fn new(level: u8) -> Option<Self> {
        if level < INTENSITY_LEVELS {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Map an 8-bit grayscale sample onto its level
    pub const fn from_gray(gray: u8) -> Self {
        Self(gray / GRAY_BAND_WIDTH)
    }

    /// Raw level value
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Number of levels lighter than this one
    ///
    /// This is also the display bin (0 lightest, 3 darkest) a correctly scaled count
    /// lands in.
    pub const fn display_bin(self) -> u8 {
        INTENSITY_LEVELS - 1 - self.0
    }

    /// Test whether this is the darkest level
    pub const fn is_darkest(self) -> bool {
        self.0 == Self::DARKEST.0
    }
}

impl fmt::Display for IntensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Levels for every calendar slot, indexed `[row, column]`
pub type LevelMap = Array2<IntensityLevel>;

/// Reject sample matrices that are not exactly calendar-shaped
///
/// # Errors
///
/// Returns `InputDimension` when the matrix is not 7 rows by 54 columns
pub fn validate_dimensions(samples: &Array2<u8>) -> Result<()> {
    let actual = samples.dim();
    let expected = (CALENDAR_ROWS, CALENDAR_COLUMNS);
    if actual == expected {
        Ok(())
    } else {
        Err(SynthesisError::InputDimension { expected, actual })
    }
}

/// Quantize a calendar-shaped grayscale matrix into intensity levels
///
/// # Errors
///
/// Returns `InputDimension` when the matrix is not 7 rows by 54 columns
pub fn quantize(samples: &Array2<u8>) -> Result<LevelMap> {
    validate_dimensions(samples)?;
    Ok(samples.mapv(IntensityLevel::from_gray))
}
