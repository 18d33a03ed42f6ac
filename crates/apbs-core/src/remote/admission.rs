//! A coarse memory guard applied before a local solver run.
//!
//! The estimate charges a fixed number of bytes per grid cell and compares the result,
//! in whole megabytes, with an optional ceiling. It is deliberately rough and does not
//! account for the number of calculations in a deck.

use crate::core::io::deck::GridDimensions;

/// Approximate memory consumed by the solver per grid cell.
pub const BYTES_PER_CELL: u64 = 160;

const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Refused { required_mb: u64, ceiling_mb: u64 },
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }
}

/// Estimated memory for a grid, in whole megabytes (truncated).
pub fn estimate_megabytes(grid: &GridDimensions) -> u64 {
    grid.cell_count().saturating_mul(BYTES_PER_CELL) / BYTES_PER_MEGABYTE
}

/// Decides whether a run on `grid` fits under `ceiling_mb`.
///
/// Without a ceiling every run is accepted. A grid whose estimate equals the ceiling is
/// refused.
pub fn check(grid: &GridDimensions, ceiling_mb: Option<u64>) -> Admission {
    let Some(ceiling_mb) = ceiling_mb else {
        return Admission::Accepted;
    };
    let required_mb = estimate_megabytes(grid);
    if required_mb >= ceiling_mb {
        Admission::Refused {
            required_mb,
            ceiling_mb,
        }
    } else {
        Admission::Accepted
    }
}
