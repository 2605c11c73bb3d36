//! Annotation encoder for the VGLNT driving-behavior dataset.
//!
//! Per-frame scene annotations become fixed-width feature vectors, per-video
//! sequences, and finally a padded, standardized tensor for sequence models.

pub mod annotation;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use annotation::{encode, encode_value, AnnotationRecord};
pub use prelude::{EncoderError, EncoderResult, FeatureVector, Tensor, VideoSequence, FEATURE_WIDTH};
pub use processing::{apply_scale, build_sequences, fit_scale, pad, Dataset, ScalerState};
