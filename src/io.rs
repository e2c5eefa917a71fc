//! Raw little-endian volume and position table files
//!
//! Volumes are stored as bare `f32` samples in `[projections, rows, columns]`
//! order, position tables as bare `f64` values. There is no header, so the
//! caller supplies the volume extents.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::volume::{ProjectionVolume, VolumeShape};

/// Read a raw `f32` volume of the given shape
pub fn read_volume(path: &Path, shape: VolumeShape) -> Result<ProjectionVolume> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read volume from {:?}", path))?;

    let samples = shape.len()?;
    let expected = samples
        .checked_mul(4)
        .with_context(|| format!("Volume {} is too large", shape))?;
    if bytes.len() != expected {
        bail!(
            "Volume file {:?} has {} bytes, expected {} for shape {}",
            path,
            bytes.len(),
            expected,
            shape
        );
    }

    let data: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    info!("Read {} volume from {:?}", shape, path);
    Ok(ProjectionVolume::from_vec(shape, data)?)
}

/// Read a raw `f64` position table
pub fn read_positions(path: &Path) -> Result<Vec<f64>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read position table from {:?}", path))?;

    if bytes.len() % 8 != 0 {
        bail!(
            "Position table {:?} has {} bytes, not a multiple of 8",
            path,
            bytes.len()
        );
    }

    let positions: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
        .collect();

    info!("Read {} positions from {:?}", positions.len(), path);
    Ok(positions)
}

/// Write a volume as raw `f32`
pub fn write_volume(path: &Path, volume: &ProjectionVolume) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {:?}", path))?;
    let mut writer = BufWriter::new(file);

    for value in volume.as_slice() {
        writer
            .write_all(&value.to_le_bytes())
            .with_context(|| format!("Failed to write volume to {:?}", path))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush volume to {:?}", path))?;

    info!("Wrote {} volume to {:?}", volume.shape(), path);
    Ok(())
}

/// Write a raw `f64` position table
pub fn write_positions(path: &Path, positions: &[f64]) -> Result<()> {
    let bytes: Vec<u8> = positions.iter().flat_map(|p| p.to_le_bytes()).collect();
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write position table to {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("flatdet-io-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_volume_file_round_trip() {
        let path = temp_path("volume.f32");
        let shape = VolumeShape::new(2, 1, 3);
        let volume =
            ProjectionVolume::from_vec(shape, vec![1.0, -2.5, 3.0, f32::MAX, 0.0, -0.0]).unwrap();

        write_volume(&path, &volume).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 24);

        let loaded = read_volume(&path, shape).unwrap();
        assert_eq!(loaded, volume);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_volume_wrong_size_is_rejected() {
        let path = temp_path("short.f32");
        std::fs::write(&path, [0u8; 10]).unwrap();

        let err = read_volume(&path, VolumeShape::new(1, 1, 3)).unwrap_err();
        assert!(err.to_string().contains("expected 12"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_positions_little_endian() {
        let path = temp_path("positions.f64");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.5f64.to_le_bytes());
        bytes.extend_from_slice(&(-3.0f64).to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();

        assert_eq!(read_positions(&path).unwrap(), vec![1.5, -3.0]);

        std::fs::write(&path, &bytes[..12]).unwrap();
        assert!(read_positions(&path).is_err());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_files_through_kernel() {
        let volume_path = temp_path("pipeline.f32");
        let positions_path = temp_path("pipeline.f64");
        let shape = VolumeShape::new(1, 1, 4);

        let curved = ProjectionVolume::from_vec(shape, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        write_volume(&volume_path, &curved).unwrap();
        write_positions(&positions_path, &[-1.0, 0.0, 1.5, 3.9, 10.0]).unwrap();

        let curved = read_volume(&volume_path, shape).unwrap();
        let positions = read_positions(&positions_path).unwrap();
        let flat = crate::resample_volume(&curved, &positions, &Default::default()).unwrap();
        assert_eq!(flat.as_slice(), &[1.0f32, 1.0, 2.5, 4.0, 4.0]);

        let _ = std::fs::remove_file(&volume_path);
        let _ = std::fs::remove_file(&positions_path);
    }

    #[test]
    fn test_missing_file() {
        let err = read_positions(&temp_path("missing.f64")).unwrap_err();
        assert!(err.to_string().contains("Failed to read position table"));
    }
}
