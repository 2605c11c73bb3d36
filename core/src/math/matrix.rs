use crate::prelude::{EncoderError, EncoderResult};
use ndarray::{Array2, Array3};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Collapses `(videos, frames, features)` into `(videos * frames, features)`.
    pub fn flatten_frames(tensor: &Array3<f32>) -> EncoderResult<Array2<f32>> {
        let (videos, frames, width) = tensor.dim();
        let rows: Vec<f32> = tensor.iter().copied().collect();
        Array2::from_shape_vec((videos * frames, width), rows).map_err(|err| {
            EncoderError::InvalidInput(format!(
                "cannot flatten ({videos}, {frames}, {width}): {err}"
            ))
        })
    }

    /// Inverse of [`MatrixHelper::flatten_frames`].
    pub fn unflatten_frames(
        rows: Array2<f32>,
        videos: usize,
        frames: usize,
    ) -> EncoderResult<Array3<f32>> {
        let width = rows.ncols();
        let flat: Vec<f32> = rows.iter().copied().collect();
        Array3::from_shape_vec((videos, frames, width), flat).map_err(|err| {
            EncoderError::InvalidInput(format!(
                "cannot reshape to ({videos}, {frames}, {width}): {err}"
            ))
        })
    }
}
