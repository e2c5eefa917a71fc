//! Curved-to-flat detector resampling
//!
//! For every `(projection, row)` pair the kernel walks the flat columns,
//! maps each one onto the curved column axis through the position table,
//! and writes a clamped or linearly interpolated sample.
//!
//! Output rows are independent: the parallel path hands each worker whole
//! rows of the output buffer, so no two workers ever write the same cache
//! line of a row and no synchronization is needed.
//!
//! The parallel path runs on whichever rayon pool is current. To bound the
//! worker count, build a pool once and call the kernel inside
//! `pool.install(..)`, or configure the global pool at startup.

use rayon::prelude::*;
use tracing::debug;

use crate::columns::ColumnTap;
use crate::error::ResampleError;
use crate::volume::{ProjectionVolume, VolumeShape};

/// Execution settings for the kernel. They never change the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResampleOptions {
    /// Split output rows across the current rayon pool
    pub parallel: bool,
    /// Below this many output rows the kernel stays on the calling thread
    pub min_parallel_rows: usize,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_rows: 64,
        }
    }
}

impl ResampleOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }
}

/// Check buffer lengths against the declared extents.
/// Returns the flat volume shape.
fn validate(
    curved_len: usize,
    positions_len: usize,
    shape: VolumeShape,
) -> Result<VolumeShape, ResampleError> {
    if shape.columns == 0 {
        return Err(ResampleError::EmptyDetector);
    }

    let expected = shape.len()?;
    if curved_len != expected {
        return Err(ResampleError::CurvedLengthMismatch {
            expected,
            actual: curved_len,
        });
    }

    let flat_shape = shape.with_columns(positions_len);
    flat_shape.len()?;
    Ok(flat_shape)
}

/// Resample `curved` into a caller-owned `out` buffer.
///
/// `shape` describes the curved volume; the flat volume has the same
/// projection and row extent and `positions.len()` columns. `out` is only
/// written, never read. Nothing is written unless every length checks out.
pub fn resample_into(
    curved: &[f32],
    positions: &[f64],
    shape: VolumeShape,
    out: &mut [f32],
    options: &ResampleOptions,
) -> Result<(), ResampleError> {
    let flat_shape = validate(curved.len(), positions.len(), shape)?;
    let expected = flat_shape.len()?;
    if out.len() != expected {
        return Err(ResampleError::OutputLengthMismatch {
            expected,
            actual: out.len(),
        });
    }

    if out.is_empty() {
        return Ok(());
    }

    let rows = shape.row_count()?;
    if !options.parallel || rows < options.min_parallel_rows {
        debug!("Sequential resampling {} -> {}", shape, flat_shape);
        resample_rows(curved, positions, shape.columns, out);
    } else {
        debug!(
            "Parallel resampling {} -> {} on {} workers",
            shape,
            flat_shape,
            rayon::current_num_threads()
        );
        par_resample_rows(curved, positions, shape.columns, out);
    }

    Ok(())
}

/// Resample `curved` into a newly allocated flat buffer
pub fn resample(
    curved: &[f32],
    positions: &[f64],
    shape: VolumeShape,
    options: &ResampleOptions,
) -> Result<Vec<f32>, ResampleError> {
    let flat_shape = validate(curved.len(), positions.len(), shape)?;
    let mut flat = vec![0.0f32; flat_shape.len()?];
    resample_into(curved, positions, shape, &mut flat, options)?;
    Ok(flat)
}

/// Resample an owned volume, taking the extents from the volume itself
pub fn resample_volume(
    curved: &ProjectionVolume,
    positions: &[f64],
    options: &ResampleOptions,
) -> Result<ProjectionVolume, ResampleError> {
    let shape = curved.shape();
    let flat = resample(curved.as_slice(), positions, shape, options)?;
    ProjectionVolume::from_vec(shape.with_columns(positions.len()), flat)
}

/// Fill one flat row from one curved row
#[inline]
fn resample_row(curved_row: &[f32], positions: &[f64], flat_row: &mut [f32]) {
    let columns = curved_row.len();
    for (out, &position) in flat_row.iter_mut().zip(positions) {
        *out = ColumnTap::resolve(position, columns).sample(curved_row);
    }
}

fn resample_rows(curved: &[f32], positions: &[f64], curved_columns: usize, out: &mut [f32]) {
    out.chunks_mut(positions.len())
        .zip(curved.chunks(curved_columns))
        .for_each(|(flat_row, curved_row)| resample_row(curved_row, positions, flat_row));
}

fn par_resample_rows(curved: &[f32], positions: &[f64], curved_columns: usize, out: &mut [f32]) {
    out.par_chunks_mut(positions.len())
        .zip(curved.par_chunks(curved_columns))
        .for_each(|(flat_row, curved_row)| resample_row(curved_row, positions, flat_row));
}
