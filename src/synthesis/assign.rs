//! Target count assignment
//!
//! Any count inside a level's bin renders at that level, so most cells only need
//! the bin's lowest count (or their existing count, if already inside the bin).
//! The very first darkest cell is the exception: it is pushed to the top edge of
//! the darkest bin so the largest count on the calendar pins the bin width.

use crate::calendar::grid::GridState;
use crate::io::error::Result;
use crate::synthesis::quantize::{IntensityLevel, LevelMap};
use crate::synthesis::scale::{ScaleResolution, bin_floor, bound};

/// Per-run target calculator carrying the anchor state
#[derive(Debug, Clone)]
pub struct TargetAssigner {
    resolution: ScaleResolution,
    max_fulfilled: bool,
}

/// Outcome of assigning targets across the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Scale the targets were computed with
    pub resolution: ScaleResolution,
    /// Cell that received the top of the darkest bin, if any cell asked for it
    pub anchor: Option<[usize; 2]>,
    /// Increments needed to take every cell from baseline to target
    pub total_increments: u64,
}

impl TargetAssigner {
    /// Start a fresh assignment at the given scale
    pub const fn new(resolution: ScaleResolution) -> Self {
        Self {
            resolution,
            max_fulfilled: false,
        }
    }

    /// Whether a cell has already claimed the top of the darkest bin
    pub const fn max_fulfilled(&self) -> bool {
        self.max_fulfilled
    }

    /// Scale this assigner works with
    pub const fn resolution(&self) -> ScaleResolution {
        self.resolution
    }

    /// Target for the next visited cell
    ///
    /// The first darkest cell gets the top edge of its bin; all others get the
    /// smallest count that is both inside their bin and not below their baseline.
    pub fn target_for(&mut self, level: IntensityLevel, baseline: u32) -> u32 {
        let scale = self.resolution.scale;
        if level.is_darkest() && !self.max_fulfilled {
            self.max_fulfilled = true;
            return bound(level, scale);
        }
        bin_floor(level, scale).max(baseline)
    }

    /// Assign targets to every active cell in calendar order
    ///
    /// # Errors
    ///
    /// Returns an error if a computed target falls below a cell's count, which means
    /// the scale was not resolved against this grid
    pub fn assign(mut self, grid: &mut GridState, levels: &LevelMap) -> Result<Assignment> {
        let mut anchor = None;
        let positions: Vec<[usize; 2]> = grid.active_positions().collect();

        for position in positions {
            let (Some(baseline), Some(&level)) = (grid.baseline(position), levels.get(position))
            else {
                continue;
            };
            let was_fulfilled = self.max_fulfilled;
            let target = self.target_for(level, baseline);
            if self.max_fulfilled && !was_fulfilled {
                anchor = Some(position);
            }
            grid.set_target(position, target)?;
        }

        let assignment = Assignment {
            resolution: self.resolution,
            anchor,
            total_increments: grid.total_increments(),
        };
        tracing::debug!(
            anchor = ?assignment.anchor,
            total_increments = assignment.total_increments,
            "assigned target counts"
        );
        Ok(assignment)
    }
}

/// Assign targets to every active cell with a fresh assigner
///
/// # Errors
///
/// Returns an error if a computed target falls below a cell's count
pub fn assign_targets(
    grid: &mut GridState,
    levels: &LevelMap,
    resolution: ScaleResolution,
) -> Result<Assignment> {
    TargetAssigner::new(resolution).assign(grid, levels)
}
