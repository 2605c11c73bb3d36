pub mod dataset;
pub mod padding;
pub mod scaling;
pub mod sequence;

pub use dataset::Dataset;
pub use padding::{pad, pad_to};
pub use scaling::{apply_scale, fit_scale, ScalerState};
pub use sequence::{build_sequences, encode_sequence, SequenceBatch, SequenceBuilder};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::record::tests::sample_value;
    use crate::prelude::FEATURE_WIDTH;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    fn frame(lane: u32, distance: u32) -> Value {
        let mut value = sample_value();
        value["lane_centering"]["score"] = json!(lane);
        value["following_distance"]["score"] = json!(distance);
        value
    }

    #[test]
    fn two_videos_build_pad_and_scale() {
        let mut input = BTreeMap::new();
        input.insert("A".to_string(), vec![frame(20, 15), frame(10, 5)]);
        input.insert("B".to_string(), vec![frame(20, 15)]);

        let batch = build_sequences(&input);
        let tensor = pad(&batch.ordered());
        assert_eq!(tensor.dim(), (2, 2, FEATURE_WIDTH));

        assert_eq!(tensor[[0, 0, 1]], 20.0);
        assert_eq!(tensor[[0, 0, 5]], 15.0);
        assert_eq!(tensor[[0, 1, 1]], 10.0);
        assert_eq!(tensor[[0, 1, 5]], 5.0);
        assert_eq!(tensor[[1, 0, 1]], 20.0);
        assert!((0..FEATURE_WIDTH).all(|c| tensor[[1, 1, c]] == 0.0));

        let (scaled, state) = fit_scale(&tensor).unwrap();
        assert_eq!(state.samples_seen, 4);
        // lane scores 20, 10, 20 and one padding zero
        assert!((state.mean[1] - 12.5).abs() < 1e-9);
        assert_eq!(apply_scale(&tensor, &state).unwrap(), scaled);
    }
}
