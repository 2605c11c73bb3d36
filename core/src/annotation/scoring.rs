use crate::annotation::record::AnnotationRecord;
use serde::{Deserialize, Serialize};

/// A scored category of the rubric and the most points a frame can earn in it.
#[derive(Debug, Clone, Copy)]
pub struct ScoreField {
    pub category: &'static str,
    pub max: u32,
    read: fn(&AnnotationRecord) -> f32,
}

impl ScoreField {
    pub fn read(&self, record: &AnnotationRecord) -> f32 {
        (self.read)(record)
    }
}

/// Rubric maxima; they add up to 100. Traffic-light and speed-limit scores
/// are normalized out of 10 even though the annotation schema admits up to 15.
pub const SCORING_CRITERIA: [ScoreField; 10] = [
    ScoreField {
        category: "lane_centering",
        max: 20,
        read: |r| r.lane_centering.score,
    },
    ScoreField {
        category: "following_distance",
        max: 15,
        read: |r| r.following_distance.score,
    },
    ScoreField {
        category: "signal_compliance.traffic_light",
        max: 10,
        read: |r| r.signal_compliance.traffic_light.score,
    },
    ScoreField {
        category: "signal_compliance.stop_sign",
        max: 5,
        read: |r| r.signal_compliance.stop_sign.score,
    },
    ScoreField {
        category: "merging_lane_change",
        max: 10,
        read: |r| r.merging_lane_change.score,
    },
    ScoreField {
        category: "pedestrian_yielding",
        max: 10,
        read: |r| r.pedestrian_yielding.score,
    },
    ScoreField {
        category: "intersection_behavior",
        max: 10,
        read: |r| r.intersection_behavior.score,
    },
    ScoreField {
        category: "road_sign_awareness.speed_limit_sign",
        max: 10,
        read: |r| r.road_sign_awareness.speed_limit_sign.score,
    },
    ScoreField {
        category: "road_sign_awareness.yield_sign",
        max: 5,
        read: |r| r.road_sign_awareness.yield_sign.score,
    },
    ScoreField {
        category: "shoulder_use",
        max: 5,
        read: |r| r.shoulder_use.score,
    },
];

pub fn max_total_score() -> u32 {
    SCORING_CRITERIA.iter().map(|field| field.max).sum()
}

/// Raw score total for one frame.
pub fn total_score(record: &AnnotationRecord) -> f32 {
    SCORING_CRITERIA.iter().map(|field| field.read(record)).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub category: String,
    /// Mean of `score / max * 100` over all frames.
    pub normalized: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub frames: usize,
    pub average_total: f32,
    pub categories: Vec<CategoryAverage>,
}

/// Averages each category's normalized score across frames. Scores outside
/// the rubric range are not clamped.
pub fn summarize_scores(records: &[AnnotationRecord]) -> Option<ScoreSummary> {
    if records.is_empty() {
        return None;
    }
    let frames = records.len() as f32;

    let categories = SCORING_CRITERIA
        .iter()
        .map(|field| {
            let sum: f32 = records
                .iter()
                .map(|record| field.read(record) / field.max as f32 * 100.0)
                .sum();
            CategoryAverage {
                category: field.category.to_string(),
                normalized: sum / frames,
            }
        })
        .collect();

    let average_total = records.iter().map(total_score).sum::<f32>() / frames;

    Some(ScoreSummary {
        frames: records.len(),
        average_total,
        categories,
    })
}
