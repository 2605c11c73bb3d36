use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

/// Video indices for each partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSplit {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles `0..count`, holds out `ceil(holdout * count)` videos and halves
/// the holdout into test (rounded up) and validation. At least one video
/// stays in training whenever there is one.
pub fn split_indices(count: usize, holdout: f64, seed: u64) -> DatasetSplit {
    let mut indices: Vec<usize> = (0..count).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let held = ((holdout * count as f64).ceil() as usize).min(count.saturating_sub(1));
    let train = indices.split_off(held);
    let test_len = (held + 1) / 2;
    let validation = indices.split_off(test_len);
    let test = indices;

    DatasetSplit {
        train,
        validation,
        test,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_cover_every_video_once() {
        let split = split_indices(20, 0.3, 42);
        assert_eq!(split.train.len(), 14);
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.validation.len(), 3);

        let mut all: Vec<usize> = split
            .train
            .iter()
            .chain(&split.validation)
            .chain(&split.test)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        assert_eq!(split_indices(11, 0.3, 42), split_indices(11, 0.3, 42));
    }

    #[test]
    fn single_video_stays_in_training() {
        let split = split_indices(1, 0.3, 42);
        assert_eq!(split.train, vec![0]);
        assert!(split.validation.is_empty() && split.test.is_empty());
    }
}
