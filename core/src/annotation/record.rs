use crate::prelude::{EncoderError, EncoderResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Literal used by the annotation API when no stop sign applies.
pub const NOT_APPLICABLE: &str = "N/A";

/// One frame's driving-scene evaluation as returned by the vision API.
///
/// Categorical values are kept as the raw strings the API produced so that
/// off-vocabulary answers reach the encoder instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub lane_centering: LaneCentering,
    pub following_distance: FollowingDistance,
    pub signal_compliance: SignalCompliance,
    pub merging_lane_change: MergingLaneChange,
    pub pedestrian_yielding: PedestrianYielding,
    pub intersection_behavior: IntersectionBehavior,
    pub road_sign_awareness: RoadSignAwareness,
    pub shoulder_use: ShoulderUse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneCentering {
    pub following_lane_discipline: bool,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowingDistance {
    pub safe_distance: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCompliance {
    pub traffic_light: TrafficLight,
    pub stop_sign: StopSign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficLight {
    pub status: String,
    pub compliance: bool,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSign {
    pub present: bool,
    pub compliance: StopSignCompliance,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergingLaneChange {
    pub safe_merging: bool,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedestrianYielding {
    pub pedestrian_present: bool,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionBehavior {
    pub stop_line_observance: bool,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSignAwareness {
    pub speed_limit_sign: SpeedLimitSign,
    pub yield_sign: YieldSign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimitSign {
    pub visible: bool,
    pub observing_limit: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldSign {
    pub visible: bool,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoulderUse {
    pub using_shoulder: bool,
    pub score: f32,
}

/// `boolean | "N/A"` answer for stop-sign compliance.
#[derive(Debug, Clone, PartialEq)]
pub enum StopSignCompliance {
    Complied(bool),
    NotApplicable,
    Other(Value),
}

impl StopSignCompliance {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(flag) => Self::Complied(*flag),
            Value::String(text) if text == NOT_APPLICABLE => Self::NotApplicable,
            other => Self::Other(other.clone()),
        }
    }
}

impl Serialize for StopSignCompliance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Complied(flag) => serializer.serialize_bool(*flag),
            Self::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
            Self::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for StopSignCompliance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_json(&value))
    }
}

fn lookup<'a>(root: &'a Value, path: &str) -> EncoderResult<&'a Value> {
    path.split('.').try_fold(root, |node, key| {
        node.get(key)
            .ok_or_else(|| EncoderError::MissingField(path.to_string()))
    })
}

fn flag(root: &Value, path: &str) -> EncoderResult<bool> {
    lookup(root, path)?
        .as_bool()
        .ok_or_else(|| EncoderError::InvalidField {
            path: path.to_string(),
            expected: "boolean",
        })
}

// Numbers beyond f32 range would encode as infinity and poison the scaler.
fn score(root: &Value, path: &str) -> EncoderResult<f32> {
    let value = lookup(root, path)?
        .as_f64()
        .ok_or_else(|| EncoderError::InvalidField {
            path: path.to_string(),
            expected: "number",
        })? as f32;
    if !value.is_finite() {
        return Err(EncoderError::InvalidField {
            path: path.to_string(),
            expected: "finite number",
        });
    }
    Ok(value)
}

// Non-string answers are carried as their JSON text and fall through the
// lookup tables as unrecognized.
fn category(root: &Value, path: &str) -> EncoderResult<String> {
    let value = lookup(root, path)?;
    Ok(match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    })
}

impl AnnotationRecord {
    /// Extracts a record from loosely-typed JSON, naming the first required
    /// path that is absent.
    pub fn from_value(root: &Value) -> EncoderResult<Self> {
        Ok(Self {
            lane_centering: LaneCentering {
                following_lane_discipline: flag(
                    root,
                    "lane_centering.following_lane_discipline",
                )?,
                score: score(root, "lane_centering.score")?,
            },
            following_distance: FollowingDistance {
                safe_distance: category(root, "following_distance.safe_distance")?,
                score: score(root, "following_distance.score")?,
            },
            signal_compliance: SignalCompliance {
                traffic_light: TrafficLight {
                    status: category(root, "signal_compliance.traffic_light.status")?,
                    compliance: flag(root, "signal_compliance.traffic_light.compliance")?,
                    score: score(root, "signal_compliance.traffic_light.score")?,
                },
                stop_sign: StopSign {
                    present: flag(root, "signal_compliance.stop_sign.present")?,
                    compliance: StopSignCompliance::from_json(lookup(
                        root,
                        "signal_compliance.stop_sign.compliance",
                    )?),
                    score: score(root, "signal_compliance.stop_sign.score")?,
                },
            },
            merging_lane_change: MergingLaneChange {
                safe_merging: flag(root, "merging_lane_change.safe_merging")?,
                score: score(root, "merging_lane_change.score")?,
            },
            pedestrian_yielding: PedestrianYielding {
                pedestrian_present: flag(root, "pedestrian_yielding.pedestrian_present")?,
                score: score(root, "pedestrian_yielding.score")?,
            },
            intersection_behavior: IntersectionBehavior {
                stop_line_observance: flag(root, "intersection_behavior.stop_line_observance")?,
                score: score(root, "intersection_behavior.score")?,
            },
            road_sign_awareness: RoadSignAwareness {
                speed_limit_sign: SpeedLimitSign {
                    visible: flag(root, "road_sign_awareness.speed_limit_sign.visible")?,
                    observing_limit: category(
                        root,
                        "road_sign_awareness.speed_limit_sign.observing_limit",
                    )?,
                    score: score(root, "road_sign_awareness.speed_limit_sign.score")?,
                },
                yield_sign: YieldSign {
                    visible: flag(root, "road_sign_awareness.yield_sign.visible")?,
                    score: score(root, "road_sign_awareness.yield_sign.score")?,
                },
            },
            shoulder_use: ShoulderUse {
                using_shoulder: flag(root, "shoulder_use.using_shoulder")?,
                score: score(root, "shoulder_use.score")?,
            },
        })
    }
}

impl TryFrom<&Value> for AnnotationRecord {
    type Error = EncoderError;

    fn try_from(value: &Value) -> EncoderResult<Self> {
        Self::from_value(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_value() -> Value {
        json!({
            "lane_centering": {"following_lane_discipline": true, "score": 18},
            "following_distance": {"safe_distance": "approximate", "score": 11},
            "signal_compliance": {
                "traffic_light": {"status": "red", "compliance": true, "score": 15},
                "stop_sign": {"present": true, "compliance": false, "score": 1}
            },
            "merging_lane_change": {"safe_merging": true, "score": 9},
            "pedestrian_yielding": {"pedestrian_present": false, "score": 10},
            "intersection_behavior": {"stop_line_observance": true, "score": 8},
            "road_sign_awareness": {
                "speed_limit_sign": {"visible": true, "observing_limit": "exceeding", "score": 6},
                "yield_sign": {"visible": false, "score": 5}
            },
            "shoulder_use": {"using_shoulder": false, "score": 5}
        })
    }

    #[test]
    fn from_value_reads_every_field() {
        let record = AnnotationRecord::from_value(&sample_value()).unwrap();
        assert_eq!(record.lane_centering.score, 18.0);
        assert_eq!(record.following_distance.safe_distance, "approximate");
        assert_eq!(
            record.signal_compliance.stop_sign.compliance,
            StopSignCompliance::Complied(false)
        );
        assert_eq!(
            record.road_sign_awareness.speed_limit_sign.observing_limit,
            "exceeding"
        );
    }

    #[test]
    fn absent_nested_field_is_reported_by_path() {
        let mut value = sample_value();
        value["signal_compliance"]["stop_sign"]
            .as_object_mut()
            .unwrap()
            .remove("score");
        let err = AnnotationRecord::from_value(&value).unwrap_err();
        assert_eq!(
            err,
            EncoderError::MissingField("signal_compliance.stop_sign.score".into())
        );
    }

    #[test]
    fn absent_section_is_reported_by_first_path_inside_it() {
        let mut value = sample_value();
        value.as_object_mut().unwrap().remove("shoulder_use");
        let err = AnnotationRecord::from_value(&value).unwrap_err();
        assert_eq!(
            err,
            EncoderError::MissingField("shoulder_use.using_shoulder".into())
        );
    }

    #[test]
    fn wrong_type_on_score_is_invalid_field() {
        let mut value = sample_value();
        value["lane_centering"]["score"] = json!("high");
        let err = AnnotationRecord::from_value(&value).unwrap_err();
        assert!(matches!(
            err,
            EncoderError::InvalidField { ref path, expected: "number" } if path == "lane_centering.score"
        ));
    }

    #[test]
    fn score_outside_f32_range_is_invalid_field() {
        for huge in [json!(1e300), json!(-1e300)] {
            let mut value = sample_value();
            value["shoulder_use"]["score"] = huge;
            assert_eq!(
                AnnotationRecord::from_value(&value),
                Err(EncoderError::InvalidField {
                    path: "shoulder_use.score".into(),
                    expected: "finite number",
                })
            );
        }
    }

    #[test]
    fn non_string_category_is_kept_as_text() {
        let mut value = sample_value();
        value["following_distance"]["safe_distance"] = json!(3);
        let record = AnnotationRecord::from_value(&value).unwrap();
        assert_eq!(record.following_distance.safe_distance, "3");
    }

    #[test]
    fn stop_sign_compliance_round_trips_through_serde() {
        let record = AnnotationRecord::from_value(&sample_value()).unwrap();
        let text = serde_json::to_string(&record).unwrap();
        let parsed: AnnotationRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, record);

        let na: StopSignCompliance = serde_json::from_value(json!("N/A")).unwrap();
        assert_eq!(na, StopSignCompliance::NotApplicable);
        assert_eq!(serde_json::to_value(&na).unwrap(), json!("N/A"));
    }
}
