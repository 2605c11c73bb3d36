//! Immutable lookup tables for the categorical annotation fields.
//!
//! Any value not listed in a table encodes as all zeros.

use crate::annotation::record::StopSignCompliance;

pub type OneHot = [f32; 3];
pub type CategoryTable = [(&'static str, OneHot); 3];

pub const UNRECOGNIZED: OneHot = [0.0, 0.0, 0.0];

pub const SAFE_DISTANCE_TABLE: CategoryTable = [
    ("safe", [1.0, 0.0, 0.0]),
    ("approximate", [0.0, 1.0, 0.0]),
    ("unsafe", [0.0, 0.0, 1.0]),
];

pub const TRAFFIC_LIGHT_TABLE: CategoryTable = [
    ("red", [1.0, 0.0, 0.0]),
    ("yellow", [0.0, 1.0, 0.0]),
    ("green", [0.0, 0.0, 1.0]),
];

pub const OBSERVING_LIMIT_TABLE: CategoryTable = [
    ("observing", [1.0, 0.0, 0.0]),
    ("exceeding", [0.0, 1.0, 0.0]),
    ("unknown", [0.0, 0.0, 1.0]),
];

/// `(complied, not complied)` pairs for stop-sign compliance.
pub const STOP_SIGN_COMPLIED: [f32; 2] = [1.0, 0.0];
pub const STOP_SIGN_NOT_COMPLIED: [f32; 2] = [0.0, 1.0];
pub const STOP_SIGN_NO_ANSWER: [f32; 2] = [0.0, 0.0];

/// Case-sensitive lookup.
pub fn one_hot(table: &CategoryTable, value: &str) -> OneHot {
    table
        .iter()
        .find(|(key, _)| *key == value)
        .map(|(_, encoding)| *encoding)
        .unwrap_or(UNRECOGNIZED)
}

pub fn stop_sign_pair(compliance: &StopSignCompliance) -> [f32; 2] {
    match compliance {
        StopSignCompliance::Complied(true) => STOP_SIGN_COMPLIED,
        StopSignCompliance::Complied(false) => STOP_SIGN_NOT_COMPLIED,
        StopSignCompliance::NotApplicable | StopSignCompliance::Other(_) => STOP_SIGN_NO_ANSWER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_table_has_distinct_single_hot_rows() {
        for table in [SAFE_DISTANCE_TABLE, TRAFFIC_LIGHT_TABLE, OBSERVING_LIMIT_TABLE] {
            for (i, (key, encoding)) in table.iter().enumerate() {
                assert_eq!(encoding.iter().filter(|&&v| v == 1.0).count(), 1);
                assert_eq!(encoding.iter().sum::<f32>(), 1.0);
                assert_eq!(one_hot(&table, key), *encoding);
                for (other_key, other) in table.iter().skip(i + 1) {
                    assert_ne!(encoding, other, "{key} and {other_key} collide");
                }
            }
        }
    }

    #[test]
    fn unknown_values_fall_back_to_zeros() {
        assert_eq!(one_hot(&SAFE_DISTANCE_TABLE, "tailgating"), UNRECOGNIZED);
        assert_eq!(one_hot(&TRAFFIC_LIGHT_TABLE, "Red"), UNRECOGNIZED);
        assert_eq!(one_hot(&OBSERVING_LIMIT_TABLE, ""), UNRECOGNIZED);
    }

    #[test]
    fn stop_sign_pairs_match_answers() {
        assert_eq!(stop_sign_pair(&StopSignCompliance::Complied(true)), [1.0, 0.0]);
        assert_eq!(stop_sign_pair(&StopSignCompliance::Complied(false)), [0.0, 1.0]);
        assert_eq!(stop_sign_pair(&StopSignCompliance::NotApplicable), [0.0, 0.0]);
        assert_eq!(
            stop_sign_pair(&StopSignCompliance::Other(json!("maybe"))),
            [0.0, 0.0]
        );
    }
}
