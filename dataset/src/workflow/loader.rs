use anyhow::Context;
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use vglntcore::EncoderError;

/// Raw frame documents grouped per video, plus the frames that did not parse.
#[derive(Debug, Default)]
pub struct LoadedAnnotations {
    pub records_by_video: BTreeMap<String, Vec<Value>>,
    pub malformed: Vec<EncoderError>,
}

impl LoadedAnnotations {
    pub fn frame_count(&self) -> usize {
        self.records_by_video.values().map(Vec::len).sum()
    }
}

/// Sort key for a frame file: trailing digits of the stem, then the name.
fn frame_key(path: &Path) -> (u64, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let index = digits.parse::<u64>().unwrap_or(u64::MAX);
    (index, stem)
}

fn frame_files(video_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(video_dir)
        .with_context(|| format!("listing frames in {}", video_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort_by_key(|path| frame_key(path));
    Ok(files)
}

fn read_frame(path: &Path) -> Result<Value, EncoderError> {
    let malformed = |reason: String| EncoderError::MalformedFrame {
        path: path.display().to_string(),
        reason,
    };
    let text = fs::read_to_string(path).map_err(|err| malformed(err.to_string()))?;
    serde_json::from_str(&text).map_err(|err| malformed(err.to_string()))
}

fn video_dirs(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)
        .with_context(|| format!("listing annotation tree {}", root.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Reads the frames of each listed video. A video whose directory cannot be
/// listed is kept without frames and its error recorded with the malformed
/// frames, so the batch goes on.
fn load_videos(video_dirs: Vec<PathBuf>) -> LoadedAnnotations {
    let mut loaded = LoadedAnnotations::default();

    for video_dir in video_dirs {
        let video_id = video_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let files = match frame_files(&video_dir) {
            Ok(files) => files,
            Err(err) => {
                warn!("skipping video {}: {:#}", video_id, err);
                loaded.malformed.push(EncoderError::MalformedFrame {
                    path: video_dir.display().to_string(),
                    reason: format!("{err:#}"),
                });
                Vec::new()
            }
        };

        let mut frames = Vec::new();
        for path in files {
            match read_frame(&path) {
                Ok(value) => frames.push(value),
                Err(err) => {
                    warn!("skipping frame: {}", err);
                    loaded.malformed.push(err);
                }
            }
        }
        if frames.is_empty() {
            warn!("no parseable frames for video {}", video_id);
        }
        loaded.records_by_video.insert(video_id, frames);
    }

    loaded
}

/// Reads `<root>/<video_id>/<frame>.json`. Frames that fail to parse are
/// skipped with a warning; videos left without frames are still listed.
/// Only an unreadable root is an error.
pub fn load_annotation_tree(root: &Path) -> anyhow::Result<LoadedAnnotations> {
    let loaded = load_videos(video_dirs(root)?);
    info!(
        "loaded {} frames across {} videos ({} malformed)",
        loaded.frame_count(),
        loaded.records_by_video.len(),
        loaded.malformed.len()
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, text: &str) {
        fs::write(path, text).unwrap();
    }

    #[test]
    fn frames_sort_by_numeric_index() {
        let root = tempdir().unwrap();
        let video = root.path().join("clip");
        fs::create_dir(&video).unwrap();
        write(&video.join("frame_10.json"), r#"{"n": 10}"#);
        write(&video.join("frame_2.json"), r#"{"n": 2}"#);
        write(&video.join("frame_000001.json"), r#"{"n": 1}"#);
        write(&video.join("notes.txt"), "ignored");

        let loaded = load_annotation_tree(root.path()).unwrap();
        let order: Vec<i64> = loaded.records_by_video["clip"]
            .iter()
            .map(|v| v["n"].as_i64().unwrap())
            .collect();
        assert_eq!(order, vec![1, 2, 10]);
    }

    #[test]
    fn malformed_json_is_skipped_and_counted() {
        let root = tempdir().unwrap();
        let video = root.path().join("clip");
        fs::create_dir(&video).unwrap();
        write(&video.join("frame_000000.json"), r#"{"ok": true}"#);
        write(&video.join("frame_000001.json"), "{ not json");

        let broken = root.path().join("broken");
        fs::create_dir(&broken).unwrap();
        write(&broken.join("frame_000000.json"), "");

        write(&root.path().join("stray.json"), "{}");

        let loaded = load_annotation_tree(root.path()).unwrap();
        assert_eq!(loaded.records_by_video.len(), 2);
        assert_eq!(loaded.records_by_video["clip"].len(), 1);
        assert!(loaded.records_by_video["broken"].is_empty());
        assert_eq!(loaded.malformed.len(), 2);
        assert!(matches!(
            loaded.malformed[0],
            EncoderError::MalformedFrame { .. }
        ));
    }

    #[test]
    fn unreadable_video_is_kept_empty_and_reported() {
        let root = tempdir().unwrap();
        let clip = root.path().join("clip");
        fs::create_dir(&clip).unwrap();
        write(&clip.join("frame_000000.json"), r#"{"ok": true}"#);
        let vanished = root.path().join("vanished");
        fs::create_dir(&vanished).unwrap();

        let dirs = video_dirs(root.path()).unwrap();
        fs::remove_dir(&vanished).unwrap();
        write(&vanished, "no longer a directory");

        let loaded = load_videos(dirs);
        assert_eq!(loaded.records_by_video["clip"].len(), 1);
        assert!(loaded.records_by_video["vanished"].is_empty());
        assert_eq!(loaded.malformed.len(), 1);
        assert!(matches!(
            &loaded.malformed[0],
            EncoderError::MalformedFrame { path, .. } if path.ends_with("vanished")
        ));
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempdir().unwrap();
        assert!(load_annotation_tree(&root.path().join("absent")).is_err());
    }
}
