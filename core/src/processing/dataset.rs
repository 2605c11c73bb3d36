use crate::prelude::{EncoderError, EncoderResult, Tensor, FEATURE_WIDTH};
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

/// Padded feature tensor paired with one externally supplied label per video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub video_ids: Vec<String>,
    pub features: Tensor,
    pub labels: Array1<f32>,
}

impl Dataset {
    pub fn new(video_ids: Vec<String>, features: Tensor, labels: Array1<f32>) -> EncoderResult<Self> {
        let (videos, _, width) = features.dim();
        if width != FEATURE_WIDTH {
            return Err(EncoderError::WidthMismatch {
                expected: FEATURE_WIDTH,
                found: width,
            });
        }
        if video_ids.len() != videos || labels.len() != videos {
            return Err(EncoderError::InvalidInput(format!(
                "{} videos, {} ids and {} labels",
                videos,
                video_ids.len(),
                labels.len()
            )));
        }
        Ok(Self {
            video_ids,
            features,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.video_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.video_ids.is_empty()
    }

    pub fn frames(&self) -> usize {
        self.features.dim().1
    }

    /// Subset of videos, in the order given.
    pub fn select(&self, indices: &[usize]) -> EncoderResult<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(EncoderError::InvalidInput(format!(
                "video index {} out of range for {} videos",
                bad,
                self.len()
            )));
        }
        Ok(Self {
            video_ids: indices.iter().map(|&i| self.video_ids[i].clone()).collect(),
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        })
    }
}
