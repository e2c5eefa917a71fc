//! Projection volumes
//!
//! A volume is a dense `[projections, rows, columns]` array of `f32`
//! samples stored row-major with columns varying fastest. The same layout
//! is used for curved and flat detector data.

use serde::{Deserialize, Serialize};

use crate::error::ResampleError;

/// Extents of a projection volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeShape {
    pub projections: usize,
    pub rows: usize,
    pub columns: usize,
}

impl VolumeShape {
    pub fn new(projections: usize, rows: usize, columns: usize) -> Self {
        Self {
            projections,
            rows,
            columns,
        }
    }

    /// Number of detector rows across all projections
    pub fn row_count(&self) -> Result<usize, ResampleError> {
        self.projections
            .checked_mul(self.rows)
            .ok_or_else(|| self.overflow())
    }

    /// Total number of samples
    pub fn len(&self) -> Result<usize, ResampleError> {
        self.row_count()?
            .checked_mul(self.columns)
            .ok_or_else(|| self.overflow())
    }

    pub fn is_empty(&self) -> bool {
        self.projections == 0 || self.rows == 0 || self.columns == 0
    }

    /// Same projection/row extent with a different column count
    pub fn with_columns(&self, columns: usize) -> Self {
        Self { columns, ..*self }
    }

    /// Offset of the first sample of row `(projection, row)`
    #[inline]
    pub fn row_offset(&self, projection: usize, row: usize) -> usize {
        (projection * self.rows + row) * self.columns
    }

    fn overflow(&self) -> ResampleError {
        ResampleError::ShapeOverflow {
            projections: self.projections,
            rows: self.rows,
            columns: self.columns,
        }
    }
}

impl std::fmt::Display for VolumeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.projections, self.rows, self.columns)
    }
}

/// An owned projection volume
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionVolume {
    shape: VolumeShape,
    data: Vec<f32>,
}

impl ProjectionVolume {
    /// Wrap an existing buffer, checking that it matches `shape`
    pub fn from_vec(shape: VolumeShape, data: Vec<f32>) -> Result<Self, ResampleError> {
        let expected = shape.len()?;
        if data.len() != expected {
            return Err(ResampleError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// A zero-filled volume
    pub fn zeros(shape: VolumeShape) -> Result<Self, ResampleError> {
        Ok(Self {
            shape,
            data: vec![0.0; shape.len()?],
        })
    }

    pub fn shape(&self) -> VolumeShape {
        self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Samples of one detector row
    pub fn row(&self, projection: usize, row: usize) -> &[f32] {
        let start = self.shape.row_offset(projection, row);
        &self.data[start..start + self.shape.columns]
    }

    pub fn row_mut(&mut self, projection: usize, row: usize) -> &mut [f32] {
        let start = self.shape.row_offset(projection, row);
        &mut self.data[start..start + self.shape.columns]
    }

    #[inline]
    pub fn get(&self, projection: usize, row: usize, column: usize) -> f32 {
        self.data[self.shape.row_offset(projection, row) + column]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_len() {
        let shape = VolumeShape::new(3, 4, 5);
        assert_eq!(shape.row_count().unwrap(), 12);
        assert_eq!(shape.len().unwrap(), 60);
        assert!(!shape.is_empty());
        assert!(VolumeShape::new(0, 4, 5).is_empty());
    }

    #[test]
    fn test_shape_overflow() {
        let shape = VolumeShape::new(usize::MAX, 2, 1);
        assert!(matches!(
            shape.len(),
            Err(ResampleError::ShapeOverflow { .. })
        ));
    }

    #[test]
    fn test_row_access() {
        let shape = VolumeShape::new(2, 2, 3);
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let mut volume = ProjectionVolume::from_vec(shape, data).unwrap();

        assert_eq!(volume.row(1, 0), &[6.0f32, 7.0, 8.0]);
        assert_eq!(volume.get(1, 1, 2), 11.0);

        volume.row_mut(0, 1)[0] = -1.0;
        assert_eq!(volume.get(0, 1, 0), -1.0);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let shape = VolumeShape::new(1, 2, 3);
        let err = ProjectionVolume::from_vec(shape, vec![0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            ResampleError::LengthMismatch {
                expected: 6,
                actual: 5
            }
        );
    }
}
