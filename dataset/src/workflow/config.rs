use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub annotations_dir: PathBuf,
    pub output_dir: PathBuf,
    /// JSON object mapping video id to label.
    pub labels: Option<PathBuf>,
    /// Seed for placeholder labels when no label file is given.
    pub label_seed: u64,
    /// Frame count to pad or truncate to; longest video when unset.
    pub max_frames: Option<usize>,
    /// Fraction of videos held out, later halved into validation and test.
    pub holdout: f64,
    pub split_seed: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            annotations_dir: PathBuf::from("data/annotations"),
            output_dir: PathBuf::from("data/dataset"),
            labels: None,
            label_seed: 0,
            max_frames: None,
            holdout: 0.3,
            split_seed: 42,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_args(
        annotations_dir: PathBuf,
        output_dir: PathBuf,
        labels: Option<PathBuf>,
        label_seed: u64,
        max_frames: Option<usize>,
    ) -> Self {
        Self {
            annotations_dir,
            output_dir,
            labels,
            label_seed,
            max_frames,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..1.0).contains(&self.holdout) {
            anyhow::bail!("holdout must be in [0, 1), got {}", self.holdout);
        }
        if self.max_frames == Some(0) {
            anyhow::bail!("max_frames must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_split_defaults() {
        let cfg = WorkflowConfig::from_args(
            PathBuf::from("in"),
            PathBuf::from("out"),
            None,
            7,
            Some(50),
        );
        assert_eq!(cfg.label_seed, 7);
        assert_eq!(cfg.max_frames, Some(50));
        assert_eq!(cfg.split_seed, 42);
        assert!((cfg.holdout - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"annotations_dir: clips\nmax_frames: 120\nholdout: 0.2\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.annotations_dir, PathBuf::from("clips"));
        assert_eq!(cfg.max_frames, Some(120));
        assert_eq!(cfg.output_dir, PathBuf::from("data/dataset"));
    }

    #[test]
    fn config_load_rejects_bad_holdout() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"holdout: 1.5\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
