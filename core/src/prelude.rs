use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Number of numeric columns produced for every annotated frame.
pub const FEATURE_WIDTH: usize = 30;

/// Dense `(videos, frames, features)` tensor handed to the training side.
pub type Tensor = Array3<f32>;

/// Fixed-order numeric encoding of one annotated frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f32; FEATURE_WIDTH]);

impl FeatureVector {
    pub fn new(values: [f32; FEATURE_WIDTH]) -> Self {
        Self(values)
    }

    pub fn zeros() -> Self {
        Self([0.0; FEATURE_WIDTH])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Index<usize> for FeatureVector {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

/// Ordered frame features for a single video, in frame-index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSequence {
    pub video_id: String,
    pub frames: Vec<FeatureVector>,
}

impl VideoSequence {
    pub fn new(video_id: impl Into<String>, frames: Vec<FeatureVector>) -> Self {
        Self {
            video_id: video_id.into(),
            frames,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// `(frames, FEATURE_WIDTH)` matrix view of the sequence.
    pub fn to_matrix(&self) -> Array2<f32> {
        let mut matrix = Array2::zeros((self.frames.len(), FEATURE_WIDTH));
        for (row, frame) in self.frames.iter().enumerate() {
            for (col, &value) in frame.as_slice().iter().enumerate() {
                matrix[[row, col]] = value;
            }
        }
        matrix
    }
}

/// Common error type for encoder operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EncoderError {
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("invalid field {path}: expected {expected}")]
    InvalidField { path: String, expected: &'static str },
    #[error("video {0} has no frame records")]
    EmptyVideo(String),
    #[error("malformed frame {path}: {reason}")]
    MalformedFrame { path: String, reason: String },
    #[error("feature width mismatch: expected {expected}, found {found}")]
    WidthMismatch { expected: usize, found: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type EncoderResult<T> = Result<T, EncoderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_matrix_keeps_frame_order() {
        let mut first = [0.0; FEATURE_WIDTH];
        first[0] = 1.0;
        let mut second = [0.0; FEATURE_WIDTH];
        second[1] = 2.0;
        let sequence = VideoSequence::new(
            "clip",
            vec![FeatureVector::new(first), FeatureVector::new(second)],
        );

        let matrix = sequence.to_matrix();
        assert_eq!(matrix.dim(), (2, FEATURE_WIDTH));
        assert_eq!(matrix[[0, 0]], 1.0);
        assert_eq!(matrix[[1, 1]], 2.0);
    }

    #[test]
    fn missing_field_message_names_path() {
        let err = EncoderError::MissingField("lane_centering.score".into());
        assert_eq!(err.to_string(), "missing field: lane_centering.score");
    }
}
