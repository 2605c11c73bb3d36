pub mod encoding;
pub mod record;
pub mod scoring;
pub mod tables;

pub use encoding::{encode, encode_value, FEATURE_NAMES};
pub use record::{AnnotationRecord, StopSignCompliance};
pub use scoring::{max_total_score, summarize_scores, ScoreSummary, SCORING_CRITERIA};
