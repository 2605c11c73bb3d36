use crate::prelude::{Tensor, VideoSequence, FEATURE_WIDTH};

/// Pads every sequence to the longest one.
pub fn pad(sequences: &[VideoSequence]) -> Tensor {
    let max_frames = sequences.iter().map(VideoSequence::len).max().unwrap_or(0);
    pad_to(sequences, max_frames)
}

/// Lays sequences out as `(videos, max_frames, FEATURE_WIDTH)`.
///
/// Shorter sequences get zero frames appended after their real frames;
/// longer ones lose their trailing frames.
pub fn pad_to(sequences: &[VideoSequence], max_frames: usize) -> Tensor {
    let mut tensor = Tensor::zeros((sequences.len(), max_frames, FEATURE_WIDTH));
    for (video, sequence) in sequences.iter().enumerate() {
        for (frame, features) in sequence.frames.iter().take(max_frames).enumerate() {
            for (column, &value) in features.as_slice().iter().enumerate() {
                tensor[[video, frame, column]] = value;
            }
        }
    }
    tensor
}
