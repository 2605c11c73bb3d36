use crate::workflow::runner::RunSummary;
use serde::{Deserialize, Serialize};
use vglntcore::ScalerState;

/// State served by the encoding bridge.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeModel {
    pub summary: Option<RunSummary>,
    pub scaler: Option<ScalerState>,
}

/// Reply to `POST /encode`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncodeReply {
    pub frames: usize,
    pub scaled: bool,
    pub features: Vec<Vec<f32>>,
}
