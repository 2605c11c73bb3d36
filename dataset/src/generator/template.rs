use vglntcore::annotation::record::{
    FollowingDistance, IntersectionBehavior, LaneCentering, MergingLaneChange,
    PedestrianYielding, RoadSignAwareness, ShoulderUse, SignalCompliance, SpeedLimitSign,
    StopSign, StopSignCompliance, TrafficLight, YieldSign,
};
use vglntcore::AnnotationRecord;

/// A frame that earns every point of the rubric: green light, no stop sign,
/// no visible signs, nobody on the shoulder.
pub fn reference_record() -> AnnotationRecord {
    AnnotationRecord {
        lane_centering: LaneCentering {
            following_lane_discipline: true,
            score: 20.0,
        },
        following_distance: FollowingDistance {
            safe_distance: "safe".into(),
            score: 15.0,
        },
        signal_compliance: SignalCompliance {
            traffic_light: TrafficLight {
                status: "green".into(),
                compliance: true,
                score: 10.0,
            },
            stop_sign: StopSign {
                present: false,
                compliance: StopSignCompliance::NotApplicable,
                score: 5.0,
            },
        },
        merging_lane_change: MergingLaneChange {
            safe_merging: true,
            score: 10.0,
        },
        pedestrian_yielding: PedestrianYielding {
            pedestrian_present: false,
            score: 10.0,
        },
        intersection_behavior: IntersectionBehavior {
            stop_line_observance: true,
            score: 10.0,
        },
        road_sign_awareness: RoadSignAwareness {
            speed_limit_sign: SpeedLimitSign {
                visible: false,
                observing_limit: "unknown".into(),
                score: 10.0,
            },
            yield_sign: YieldSign {
                visible: false,
                score: 5.0,
            },
        },
        shoulder_use: ShoulderUse {
            using_shoulder: false,
            score: 5.0,
        },
    }
}
