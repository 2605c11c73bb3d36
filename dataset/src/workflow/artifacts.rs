use crate::workflow::runner::WorkflowResult;
use anyhow::Context;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use vglntcore::annotation::FEATURE_NAMES;
use vglntcore::processing::Dataset;
use vglntcore::ScalerState;

use crate::workflow::split::DatasetSplit;

pub const DATASET_FILE: &str = "dataset.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const RUN_LOG_FILE: &str = "runs.log";

#[derive(Serialize)]
struct DatasetArtifact<'a> {
    feature_names: &'a [&'static str],
    #[serde(flatten)]
    dataset: &'a Dataset,
    split: &'a DatasetSplit,
}

pub struct ArtifactPaths {
    pub dataset: PathBuf,
    pub scaler: PathBuf,
    pub summary: PathBuf,
}

/// Writes the scaled tensor, scaler state and run summary as JSON and
/// appends a one-line record of the run.
pub fn write_artifacts(dir: &Path, result: &WorkflowResult) -> anyhow::Result<ArtifactPaths> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let paths = ArtifactPaths {
        dataset: dir.join(DATASET_FILE),
        scaler: dir.join(SCALER_FILE),
        summary: dir.join(SUMMARY_FILE),
    };

    let artifact = DatasetArtifact {
        feature_names: &FEATURE_NAMES,
        dataset: &result.dataset,
        split: &result.split,
    };
    let dataset_json = serde_json::to_string(&artifact).context("serializing dataset")?;
    fs::write(&paths.dataset, dataset_json)
        .with_context(|| format!("writing {}", paths.dataset.display()))?;

    let scaler_json = result.scaler.to_json().context("serializing scaler")?;
    fs::write(&paths.scaler, scaler_json)
        .with_context(|| format!("writing {}", paths.scaler.display()))?;

    let summary_json =
        serde_json::to_string_pretty(&result.summary).context("serializing run summary")?;
    fs::write(&paths.summary, summary_json)
        .with_context(|| format!("writing {}", paths.summary.display()))?;

    let summary = &result.summary;
    let line = format!(
        "shape={:?} succeeded={} skipped={} failed={} malformed_frames={} placeholder_labels={}\n",
        summary.tensor_shape,
        summary.batch.succeeded,
        summary.batch.skipped,
        summary.batch.failed,
        summary.malformed_frames,
        summary.placeholder_labels
    );
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(RUN_LOG_FILE))?;
    log.write_all(line.as_bytes())?;

    Ok(paths)
}

/// Loads a scaler saved by an earlier run so serving reuses its statistics.
pub fn read_scaler(path: &Path) -> anyhow::Result<ScalerState> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ScalerState::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}
