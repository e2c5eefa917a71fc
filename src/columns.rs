//! Flat-to-curved column mapping
//!
//! Each flat detector column maps to a real-valued position on the curved
//! detector's column axis. A [`ColumnTap`] is that position resolved into
//! the samples it reads: the left edge, the right edge, or a pair of
//! neighbours blended with a linear weight.

use serde::{Deserialize, Serialize};

/// How one flat column is sampled from a curved row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnTap {
    /// Before the first detector: clamp to the leftmost sample
    Left,
    /// At or after the last detector: clamp to the rightmost sample
    Right,
    /// Blend `row[index]` and `row[index + 1]`, `weight` in `[0, 1)`
    Lerp { index: usize, weight: f64 },
}

impl ColumnTap {
    /// Resolve a curved-axis position against a detector of `curved_columns`
    /// columns. `curved_columns` must be non-zero.
    ///
    /// Float-to-int casts saturate, so positions beyond the `i64` range
    /// (including infinities) fall into the clamp branches. NaN floors to 0:
    /// it yields a NaN weight, or the right clamp on a single-column detector.
    #[inline]
    pub fn resolve(position: f64, curved_columns: usize) -> Self {
        let idx = position.floor() as i64;
        let last = curved_columns as i64 - 1;

        if idx < 0 {
            ColumnTap::Left
        } else if idx >= last {
            ColumnTap::Right
        } else {
            ColumnTap::Lerp {
                index: idx as usize,
                weight: position - idx as f64,
            }
        }
    }

    /// Sample a curved row. Accumulates in `f64` and narrows once.
    #[inline]
    pub fn sample(self, row: &[f32]) -> f32 {
        match self {
            ColumnTap::Left => row[0],
            ColumnTap::Right => row[row.len() - 1],
            ColumnTap::Lerp { index, weight } => {
                let v0 = row[index] as f64;
                let v1 = row[index + 1] as f64;
                ((1.0 - weight) * v0 + weight * v1) as f32
            }
        }
    }
}

/// How many flat columns fall into each sampling branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub clamped_left: usize,
    pub clamped_right: usize,
    pub interpolated: usize,
}

impl ColumnStats {
    /// Classify a position table. This is a separate pass over the table;
    /// the kernel never computes it.
    pub fn from_positions(positions: &[f64], curved_columns: usize) -> Self {
        let mut stats = Self::default();
        for &position in positions {
            match ColumnTap::resolve(position, curved_columns) {
                ColumnTap::Left => stats.clamped_left += 1,
                ColumnTap::Right => stats.clamped_right += 1,
                ColumnTap::Lerp { .. } => stats.interpolated += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.clamped_left + self.clamped_right + self.interpolated
    }
}
