use crate::workflow::config::WorkflowConfig;
use crate::workflow::labels::LabelSource;
use crate::workflow::loader::{load_annotation_tree, LoadedAnnotations};
use crate::workflow::split::{split_indices, DatasetSplit};
use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use vglntcore::annotation::{summarize_scores, AnnotationRecord, ScoreSummary};
use vglntcore::processing::{build_sequences, fit_scale, pad, pad_to, Dataset, ScalerState};
use vglntcore::telemetry::BatchSummary;

/// What a run saw and produced, for logs and the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub videos_found: usize,
    pub frames_loaded: usize,
    pub malformed_frames: usize,
    pub batch: BatchSummary,
    /// `(video_id, reason)` for every video left out of the tensor.
    pub issues: Vec<(String, String)>,
    pub tensor_shape: [usize; 3],
    pub train: usize,
    pub validation: usize,
    pub test: usize,
    pub placeholder_labels: bool,
    pub scores: Option<ScoreSummary>,
}

pub struct WorkflowResult {
    /// Scaled features with their labels.
    pub dataset: Dataset,
    pub scaler: ScalerState,
    pub split: DatasetSplit,
    pub summary: RunSummary,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let loaded = load_annotation_tree(&self.config.annotations_dir)
            .context("loading annotation tree")?;
        self.execute_loaded(&loaded)
    }

    pub fn execute_loaded(&self, loaded: &LoadedAnnotations) -> anyhow::Result<WorkflowResult> {
        let batch = build_sequences(&loaded.records_by_video);
        let sequences = batch.ordered();
        if sequences.is_empty() {
            anyhow::bail!(
                "no usable videos under {} ({} skipped, {} failed)",
                self.config.annotations_dir.display(),
                batch.summary.skipped,
                batch.summary.failed
            );
        }

        let tensor = match self.config.max_frames {
            Some(max_frames) => pad_to(&sequences, max_frames),
            None => pad(&sequences),
        };
        let video_ids: Vec<String> = sequences.iter().map(|s| s.video_id.clone()).collect();

        let label_source = LabelSource::from_config(&self.config);
        let labels = label_source
            .resolve(&video_ids)
            .context("resolving video labels")?;

        let (scaled, scaler) = fit_scale(&tensor).context("fitting feature scaler")?;
        let dataset =
            Dataset::new(video_ids, scaled, labels).context("assembling dataset tensor")?;
        let split = split_indices(dataset.len(), self.config.holdout, self.config.split_seed);

        let (videos, frames, width) = dataset.features.dim();
        let summary = RunSummary {
            videos_found: loaded.records_by_video.len(),
            frames_loaded: loaded.frame_count(),
            malformed_frames: loaded.malformed.len(),
            batch: batch.summary,
            issues: batch
                .issues
                .iter()
                .map(|(id, err)| (id.clone(), err.to_string()))
                .collect(),
            tensor_shape: [videos, frames, width],
            train: split.train.len(),
            validation: split.validation.len(),
            test: split.test.len(),
            placeholder_labels: label_source.is_placeholder(),
            scores: score_loaded(loaded),
        };

        Ok(WorkflowResult {
            dataset,
            scaler,
            split,
            summary,
        })
    }

    pub fn score(&self) -> anyhow::Result<Option<ScoreSummary>> {
        let loaded = load_annotation_tree(&self.config.annotations_dir)
            .context("loading annotation tree")?;
        Ok(score_loaded(&loaded))
    }
}

/// Rubric averages over every frame that satisfies the schema.
fn score_loaded(loaded: &LoadedAnnotations) -> Option<ScoreSummary> {
    let records: Vec<AnnotationRecord> = loaded
        .records_by_video
        .iter()
        .flat_map(|(video_id, frames)| {
            frames
                .iter()
                .filter_map(move |frame| match AnnotationRecord::from_value(frame) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!("not scoring frame of {}: {}", video_id, err);
                        None
                    }
                })
        })
        .collect();
    summarize_scores(&records)
}
