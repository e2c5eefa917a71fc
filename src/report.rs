//! Run report for a resampling job

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::columns::ColumnStats;
use crate::resample::ResampleOptions;
use crate::volume::VolumeShape;

/// Summary of one resampling run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// Curved input extents
    pub curved: VolumeShape,
    /// Flat output extents
    pub flat: VolumeShape,
    #[serde(flatten)]
    pub columns: ColumnStats,
    /// Worker threads available to the kernel
    pub workers: usize,
    pub parallel: bool,
    /// Kernel wall time in milliseconds
    pub elapsed_ms: f64,
}

impl RunReport {
    pub fn new(
        curved: VolumeShape,
        flat_columns: usize,
        columns: ColumnStats,
        options: &ResampleOptions,
        elapsed: Duration,
    ) -> Self {
        Self {
            curved,
            flat: curved.with_columns(flat_columns),
            columns,
            workers: if options.parallel {
                rayon::current_num_threads()
            } else {
                1
            },
            parallel: options.parallel,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run report")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write run report to {:?}", path))?;
        tracing::info!("Saved run report to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json() {
        let stats = ColumnStats {
            clamped_left: 1,
            clamped_right: 2,
            interpolated: 2,
        };
        let report = RunReport::new(
            VolumeShape::new(1, 1, 4),
            5,
            stats,
            &ResampleOptions::default(),
            Duration::from_millis(3),
        );

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["flat"]["columns"], 5);
        assert_eq!(value["clamped_right"], 2);
        assert_eq!(value["parallel"], true);
        assert_eq!(value["workers"], rayon::current_num_threads());

        let sequential = RunReport::new(
            VolumeShape::new(1, 1, 4),
            5,
            stats,
            &ResampleOptions::sequential(),
            Duration::from_millis(3),
        );
        assert_eq!(sequential.workers, 1);

        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
