use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vglntcore::annotation::record::StopSignCompliance;
use vglntcore::annotation::tables::{
    CategoryTable, OBSERVING_LIMIT_TABLE, SAFE_DISTANCE_TABLE, TRAFFIC_LIGHT_TABLE,
};
use vglntcore::annotation::SCORING_CRITERIA;
use vglntcore::AnnotationRecord;

use crate::generator::template::reference_record;

/// Answer used when the generator simulates an off-vocabulary reply.
pub const OFF_VOCABULARY: &str = "unclear";

/// Configuration for generating synthetic annotation trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub videos: usize,
    pub min_frames: usize,
    pub max_frames: usize,
    /// Probability that a categorical answer falls outside its vocabulary.
    pub unknown_rate: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            videos: 4,
            min_frames: 3,
            max_frames: 8,
            unknown_rate: 0.05,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    fn frame_range(&self) -> (usize, usize) {
        let low = self.min_frames.max(1);
        (low, self.max_frames.max(low))
    }
}

fn pick_category(rng: &mut StdRng, table: &CategoryTable, unknown_rate: f64) -> String {
    if rng.gen_bool(unknown_rate.clamp(0.0, 1.0)) {
        return OFF_VOCABULARY.to_string();
    }
    table[rng.gen_range(0..table.len())].0.to_string()
}

fn draw_score(rng: &mut StdRng, max: u32) -> f32 {
    rng.gen_range(0..=max) as f32
}

pub fn synthesize_record(rng: &mut StdRng, config: &GeneratorConfig) -> AnnotationRecord {
    let mut record = reference_record();
    let rate = config.unknown_rate;
    let scores: Vec<f32> = SCORING_CRITERIA
        .iter()
        .map(|field| draw_score(rng, field.max))
        .collect();

    record.lane_centering.following_lane_discipline = rng.gen_bool(0.8);
    record.lane_centering.score = scores[0];
    record.following_distance.safe_distance = pick_category(rng, &SAFE_DISTANCE_TABLE, rate);
    record.following_distance.score = scores[1];

    let light = &mut record.signal_compliance.traffic_light;
    light.status = pick_category(rng, &TRAFFIC_LIGHT_TABLE, rate);
    light.compliance = rng.gen_bool(0.9);
    light.score = scores[2];

    let stop = &mut record.signal_compliance.stop_sign;
    stop.present = rng.gen_bool(0.2);
    stop.compliance = if stop.present {
        StopSignCompliance::Complied(rng.gen_bool(0.85))
    } else {
        StopSignCompliance::NotApplicable
    };
    stop.score = scores[3];

    record.merging_lane_change.safe_merging = rng.gen_bool(0.9);
    record.merging_lane_change.score = scores[4];
    record.pedestrian_yielding.pedestrian_present = rng.gen_bool(0.3);
    record.pedestrian_yielding.score = scores[5];
    record.intersection_behavior.stop_line_observance = rng.gen_bool(0.85);
    record.intersection_behavior.score = scores[6];

    let speed = &mut record.road_sign_awareness.speed_limit_sign;
    speed.visible = rng.gen_bool(0.4);
    speed.observing_limit = pick_category(rng, &OBSERVING_LIMIT_TABLE, rate);
    speed.score = scores[7];

    let yield_sign = &mut record.road_sign_awareness.yield_sign;
    yield_sign.visible = rng.gen_bool(0.1);
    yield_sign.score = scores[8];

    record.shoulder_use.using_shoulder = rng.gen_bool(0.05);
    record.shoulder_use.score = scores[9];
    record
}

/// Writes `<root>/video_NNN/frame_NNNNNN.json` files and returns the number
/// of frames written.
pub fn write_annotation_tree(root: &Path, config: &GeneratorConfig) -> anyhow::Result<usize> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (low, high) = config.frame_range();
    let mut written = 0;

    for video in 0..config.videos {
        let video_dir = root.join(format!("video_{video:03}"));
        fs::create_dir_all(&video_dir)
            .with_context(|| format!("creating {}", video_dir.display()))?;
        let frames = rng.gen_range(low..=high);
        for frame in 0..frames {
            let record = synthesize_record(&mut rng, config);
            let text = serde_json::to_string_pretty(&record)
                .context("serializing synthetic annotation")?;
            let path = video_dir.join(format!("frame_{frame:06}.json"));
            fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
            written += 1;
        }
    }

    Ok(written)
}
