//! flatdet - curved-to-flat detector resampling
//!
//! Projections captured on a curved (cylindrical) detector are resampled
//! onto a virtual flat detector before flat-geometry reconstruction. The
//! caller supplies a table giving, for every flat column, its real-valued
//! position on the curved column axis; the kernel clamps or linearly
//! interpolates each detector row against that table.
//!
//! ```ignore
//! use flatdet::{resample, ResampleOptions, VolumeShape};
//!
//! let curved = [1.0f32, 2.0, 3.0, 4.0];
//! let positions = [-1.0, 0.0, 1.5, 3.9, 10.0];
//! let flat = resample(&curved, &positions, VolumeShape::new(1, 1, 4), &ResampleOptions::default())?;
//! assert_eq!(flat, vec![1.0, 1.0, 2.5, 4.0, 4.0]);
//! ```

pub mod columns;
pub mod config;
pub mod error;
pub mod io;
pub mod report;
pub mod resample;
pub mod volume;

pub use columns::{ColumnStats, ColumnTap};
pub use error::ResampleError;
pub use resample::{resample, resample_into, resample_volume, ResampleOptions};
pub use volume::{ProjectionVolume, VolumeShape};
