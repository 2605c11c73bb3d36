use crate::math::{MatrixHelper, StatsHelper};
use crate::prelude::{EncoderError, EncoderResult, Tensor};
use serde::{Deserialize, Serialize};

/// Columns whose standard deviation falls below this are left unscaled.
const ZERO_SCALE_TOLERANCE: f64 = 10.0 * f64::EPSILON;

/// Fitted per-column standardization parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    pub mean: Vec<f64>,
    pub var: Vec<f64>,
    pub scale: Vec<f64>,
    pub samples_seen: usize,
}

impl ScalerState {
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn to_json(&self) -> EncoderResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| EncoderError::InvalidInput(format!("serializing scaler: {err}")))
    }

    pub fn from_json(text: &str) -> EncoderResult<Self> {
        let state: ScalerState = serde_json::from_str(text)
            .map_err(|err| EncoderError::InvalidInput(format!("parsing scaler: {err}")))?;
        if state.var.len() != state.width() || state.scale.len() != state.width() {
            return Err(EncoderError::InvalidInput(
                "scaler columns have inconsistent lengths".into(),
            ));
        }
        Ok(state)
    }
}

/// Fits a standard scaler over every `(video, frame)` row, padding rows
/// included, and returns the scaled tensor with the fitted state.
pub fn fit_scale(tensor: &Tensor) -> EncoderResult<(Tensor, ScalerState)> {
    let rows = MatrixHelper::flatten_frames(tensor)?;
    let moments = StatsHelper::column_moments(rows.view())
        .ok_or_else(|| EncoderError::InvalidInput("cannot fit scaler on empty tensor".into()))?;

    let scale = moments
        .var
        .iter()
        .map(|&v| {
            let std = v.sqrt();
            if std < ZERO_SCALE_TOLERANCE {
                1.0
            } else {
                std
            }
        })
        .collect();

    let state = ScalerState {
        mean: moments.mean,
        var: moments.var,
        scale,
        samples_seen: moments.rows,
    };
    let scaled = apply_scale(tensor, &state)?;
    Ok((scaled, state))
}

/// Standardizes a tensor with previously fitted statistics.
pub fn apply_scale(tensor: &Tensor, state: &ScalerState) -> EncoderResult<Tensor> {
    let (videos, frames, width) = tensor.dim();
    if width != state.width() {
        return Err(EncoderError::WidthMismatch {
            expected: state.width(),
            found: width,
        });
    }

    let mut rows = MatrixHelper::flatten_frames(tensor)?;
    for mut row in rows.rows_mut() {
        for (column, value) in row.iter_mut().enumerate() {
            *value = ((*value as f64 - state.mean[column]) / state.scale[column]) as f32;
        }
    }
    MatrixHelper::unflatten_frames(rows, videos, frames)
}
