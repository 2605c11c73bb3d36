use crate::annotation::encode_value;
use crate::prelude::{EncoderError, EncoderResult, VideoSequence};
use crate::telemetry::{BatchSummary, LogManager, MetricsRecorder};
use serde_json::Value;
use std::collections::BTreeMap;

/// Result of encoding a whole batch of videos.
#[derive(Debug, Clone, Default)]
pub struct SequenceBatch {
    pub sequences: BTreeMap<String, VideoSequence>,
    /// Videos that produced no sequence, with the reason.
    pub issues: BTreeMap<String, EncoderError>,
    pub summary: BatchSummary,
}

impl SequenceBatch {
    /// Sequences in video-id order.
    pub fn ordered(&self) -> Vec<VideoSequence> {
        self.sequences.values().cloned().collect()
    }
}

/// Encodes one video's frames in order. The first frame that fails
/// extraction fails the video.
pub fn encode_sequence(video_id: &str, frames: &[Value]) -> EncoderResult<VideoSequence> {
    if frames.is_empty() {
        return Err(EncoderError::EmptyVideo(video_id.to_string()));
    }
    let encoded = frames
        .iter()
        .map(encode_value)
        .collect::<EncoderResult<Vec<_>>>()?;
    Ok(VideoSequence::new(video_id, encoded))
}

pub struct SequenceBuilder {
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("sequence"),
            metrics: MetricsRecorder::new(),
        }
    }

    /// Encodes every video; empty or invalid videos are reported, never fatal.
    pub fn build(&self, records_by_video: &BTreeMap<String, Vec<Value>>) -> SequenceBatch {
        let mut batch = SequenceBatch::default();

        for (video_id, frames) in records_by_video {
            match encode_sequence(video_id, frames) {
                Ok(sequence) => {
                    self.metrics.record_succeeded();
                    batch.sequences.insert(video_id.clone(), sequence);
                }
                Err(err @ EncoderError::EmptyVideo(_)) => {
                    self.metrics.record_skipped();
                    self.logger.skip(&format!("skipping {}: {}", video_id, err));
                    batch.issues.insert(video_id.clone(), err);
                }
                Err(err) => {
                    self.metrics.record_failed();
                    self.logger.skip(&format!("video {} failed: {}", video_id, err));
                    batch.issues.insert(video_id.clone(), err);
                }
            }
        }

        batch.summary = self.metrics.snapshot();
        self.logger.record(&format!(
            "encoded {} videos ({} skipped, {} failed)",
            batch.summary.succeeded, batch.summary.skipped, batch.summary.failed
        ));
        batch
    }
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_sequences(records_by_video: &BTreeMap<String, Vec<Value>>) -> SequenceBatch {
    SequenceBuilder::new().build(records_by_video)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::record::tests::sample_value;

    #[test]
    fn empty_video_is_skipped_without_affecting_others() {
        let mut input = BTreeMap::new();
        input.insert("a".to_string(), vec![sample_value(), sample_value()]);
        input.insert("empty".to_string(), Vec::new());
        input.insert("b".to_string(), vec![sample_value()]);

        let batch = build_sequences(&input);
        assert_eq!(batch.sequences.len(), 2);
        assert!(!batch.sequences.contains_key("empty"));
        assert_eq!(
            batch.issues.get("empty"),
            Some(&EncoderError::EmptyVideo("empty".into()))
        );
        assert_eq!(batch.sequences["a"].len(), 2);
        assert_eq!(batch.sequences["b"].len(), 1);
        assert_eq!(
            batch.summary,
            BatchSummary {
                succeeded: 2,
                skipped: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn invalid_record_fails_only_its_video() {
        let mut broken = sample_value();
        broken["shoulder_use"]
            .as_object_mut()
            .unwrap()
            .remove("score");

        let mut input = BTreeMap::new();
        input.insert("bad".to_string(), vec![sample_value(), broken]);
        input.insert("good".to_string(), vec![sample_value()]);

        let batch = build_sequences(&input);
        assert!(batch.sequences.contains_key("good"));
        assert_eq!(
            batch.issues.get("bad"),
            Some(&EncoderError::MissingField("shoulder_use.score".into()))
        );
        assert_eq!(batch.summary.failed, 1);
        assert_eq!(batch.summary.succeeded, 1);
    }

    #[test]
    fn frames_keep_their_order() {
        let mut first = sample_value();
        first["lane_centering"]["score"] = serde_json::json!(20);
        let mut second = sample_value();
        second["lane_centering"]["score"] = serde_json::json!(10);

        let sequence = encode_sequence("clip", &[first, second]).unwrap();
        assert_eq!(sequence.frames[0][1], 20.0);
        assert_eq!(sequence.frames[1][1], 10.0);
    }
}
