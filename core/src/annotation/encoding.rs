use crate::annotation::record::AnnotationRecord;
use crate::annotation::tables::{
    one_hot, stop_sign_pair, OBSERVING_LIMIT_TABLE, SAFE_DISTANCE_TABLE, TRAFFIC_LIGHT_TABLE,
};
use crate::prelude::{EncoderResult, FeatureVector, FEATURE_WIDTH};
use serde_json::Value;

/// Column names in feature-layout order.
pub const FEATURE_NAMES: [&str; FEATURE_WIDTH] = [
    "lane_centering.following_lane_discipline",
    "lane_centering.score",
    "following_distance.safe_distance=safe",
    "following_distance.safe_distance=approximate",
    "following_distance.safe_distance=unsafe",
    "following_distance.score",
    "traffic_light.status=red",
    "traffic_light.status=yellow",
    "traffic_light.status=green",
    "traffic_light.compliance",
    "traffic_light.score",
    "stop_sign.present",
    "stop_sign.compliance=true",
    "stop_sign.compliance=false",
    "stop_sign.score",
    "speed_limit_sign.visible",
    "speed_limit_sign.observing_limit=observing",
    "speed_limit_sign.observing_limit=exceeding",
    "speed_limit_sign.observing_limit=unknown",
    "speed_limit_sign.score",
    "yield_sign.visible",
    "yield_sign.score",
    "shoulder_use.using_shoulder",
    "shoulder_use.score",
    "merging_lane_change.safe_merging",
    "merging_lane_change.score",
    "pedestrian_yielding.pedestrian_present",
    "pedestrian_yielding.score",
    "intersection_behavior.stop_line_observance",
    "intersection_behavior.score",
];

fn indicator(flag: bool) -> f32 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Encodes one frame into the fixed 30-column layout consumed by the
/// sequence model. Changing the order invalidates every trained model.
pub fn encode(record: &AnnotationRecord) -> FeatureVector {
    let lane = &record.lane_centering;
    let distance = &record.following_distance;
    let light = &record.signal_compliance.traffic_light;
    let stop = &record.signal_compliance.stop_sign;
    let speed = &record.road_sign_awareness.speed_limit_sign;
    let yield_sign = &record.road_sign_awareness.yield_sign;

    let mut values = Vec::with_capacity(FEATURE_WIDTH);
    values.push(indicator(lane.following_lane_discipline));
    values.push(lane.score);
    values.extend_from_slice(&one_hot(&SAFE_DISTANCE_TABLE, &distance.safe_distance));
    values.push(distance.score);
    values.extend_from_slice(&one_hot(&TRAFFIC_LIGHT_TABLE, &light.status));
    values.push(indicator(light.compliance));
    values.push(light.score);
    values.push(indicator(stop.present));
    values.extend_from_slice(&stop_sign_pair(&stop.compliance));
    values.push(stop.score);
    values.push(indicator(speed.visible));
    values.extend_from_slice(&one_hot(&OBSERVING_LIMIT_TABLE, &speed.observing_limit));
    values.push(speed.score);
    values.push(indicator(yield_sign.visible));
    values.push(yield_sign.score);
    values.push(indicator(record.shoulder_use.using_shoulder));
    values.push(record.shoulder_use.score);
    values.push(indicator(record.merging_lane_change.safe_merging));
    values.push(record.merging_lane_change.score);
    values.push(indicator(record.pedestrian_yielding.pedestrian_present));
    values.push(record.pedestrian_yielding.score);
    values.push(indicator(record.intersection_behavior.stop_line_observance));
    values.push(record.intersection_behavior.score);

    let mut fixed = [0.0; FEATURE_WIDTH];
    fixed.copy_from_slice(&values);
    FeatureVector::new(fixed)
}

/// Extracts and encodes a raw JSON frame. Absent structural fields fail the
/// whole frame; unrecognized categorical values never do.
pub fn encode_value(value: &Value) -> EncoderResult<FeatureVector> {
    AnnotationRecord::from_value(value).map(|record| encode(&record))
}
