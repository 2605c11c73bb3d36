use anyhow::Context;
use log::warn;
use ndarray::Array1;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::workflow::config::WorkflowConfig;

/// Upper bound (exclusive) of placeholder labels.
pub const PLACEHOLDER_MAX: f32 = 5.0;

/// Where per-video regression targets come from.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSource {
    /// JSON object mapping video id to label.
    File(PathBuf),
    /// Uniform draws in `[0, PLACEHOLDER_MAX)`; not derived from annotations.
    Placeholder { seed: u64 },
}

impl LabelSource {
    pub fn from_config(config: &WorkflowConfig) -> Self {
        match &config.labels {
            Some(path) => Self::File(path.clone()),
            None => Self::Placeholder {
                seed: config.label_seed,
            },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    /// One label per video, in the order of `video_ids`.
    pub fn resolve(&self, video_ids: &[String]) -> anyhow::Result<Array1<f32>> {
        match self {
            Self::File(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading labels {}", path.display()))?;
                let labels: HashMap<String, f32> = serde_json::from_str(&text)
                    .with_context(|| format!("parsing labels {}", path.display()))?;
                video_ids
                    .iter()
                    .map(|id| {
                        labels.get(id).copied().with_context(|| {
                            format!("no label for video {} in {}", id, path.display())
                        })
                    })
                    .collect::<anyhow::Result<Vec<f32>>>()
                    .map(Array1::from)
            }
            Self::Placeholder { seed } => {
                warn!(
                    "using placeholder labels for {} videos (seed {})",
                    video_ids.len(),
                    seed
                );
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok(video_ids
                    .iter()
                    .map(|_| rng.gen_range(0.0..PLACEHOLDER_MAX))
                    .collect())
            }
        }
    }
}
