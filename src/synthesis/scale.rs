//! Minimal scale factor search
//!
//! A scale factor `s` splits positive counts into four bins of width `s`:
//! `1..=s` renders lightest, `3s+1..=4s` darkest. The resolver picks the smallest
//! `s` for which every existing count still fits under the top edge of the bin its
//! desired level maps to, so no cell ever needs its count lowered.

use crate::calendar::grid::GridState;
use crate::io::configuration::INTENSITY_LEVELS;
use crate::synthesis::quantize::{IntensityLevel, LevelMap};

/// Upper edge of the count bin for `level` at `scale`
pub const fn bound(level: IntensityLevel, scale: u32) -> u32 {
    scale.saturating_mul((INTENSITY_LEVELS - level.get()) as u32)
}

/// Lower edge of the count bin for `level` at `scale`
pub const fn bin_floor(level: IntensityLevel, scale: u32) -> u32 {
    scale
        .saturating_mul((INTENSITY_LEVELS - 1 - level.get()) as u32)
        .saturating_add(1)
}

/// Scale factor chosen for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleResolution {
    /// Width of each count bin
    pub scale: u32,
    /// Top edge of the darkest bin
    pub max_contrib: u32,
}

impl ScaleResolution {
    /// Resolution for an explicit scale factor
    pub const fn with_scale(scale: u32) -> Self {
        let scale = if scale == 0 { 1 } else { scale };
        Self {
            scale,
            max_contrib: bound(IntensityLevel::DARKEST, scale),
        }
    }

    /// Display bin (0 lightest, 3 darkest) a count renders in, `None` for zero
    pub const fn display_bin(&self, count: u32) -> Option<u8> {
        if count == 0 {
            return None;
        }
        let Some(bin) = (count - 1).checked_div(self.scale) else {
            return None;
        };
        let top = (INTENSITY_LEVELS - 1) as u32;
        let clamped = if bin > top { top } else { bin };
        Some(clamped as u8)
    }

    /// Intensity level a count renders as, `None` for zero
    pub const fn level_of(&self, count: u32) -> Option<IntensityLevel> {
        match self.display_bin(count) {
            Some(bin) => IntensityLevel::new(INTENSITY_LEVELS - 1 - bin),
            None => None,
        }
    }

    /// Test whether a count fits under the bin edge of `level`
    pub const fn admits(&self, level: IntensityLevel, count: u32) -> bool {
        count <= bound(level, self.scale)
    }
}

/// Find the smallest scale at which every active baseline fits its level's bin
///
/// Raising the scale only relaxes each cell's constraint, so a single pass that
/// grows the scale to the smallest value satisfying each cell in turn yields the
/// global minimum regardless of visit order.
pub fn resolve_scale(grid: &GridState, levels: &LevelMap) -> ScaleResolution {
    let mut scale = 1_u32;
    for position in grid.active_positions() {
        let (Some(baseline), Some(&level)) = (grid.baseline(position), levels.get(position))
        else {
            continue;
        };
        if baseline > bound(level, scale) {
            let width = u32::from(INTENSITY_LEVELS - level.get());
            scale = baseline.div_ceil(width);
        }
    }

    let resolution = ScaleResolution::with_scale(scale);
    tracing::debug!(
        scale = resolution.scale,
        max_contrib = resolution.max_contrib,
        "resolved scale factor"
    );
    resolution
}
