//! Stratified train/test split over binary labels.

use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fewest rows of each class required in each partition.
pub const MIN_CLASS_ROWS: usize = 2;

/// ChaCha stream reserved for the split; forest trees use streams `0..n_trees`.
const SPLIT_STREAM: u64 = u64::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Row indices, ascending
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle each class with the seeded RNG and move `round(n_class * test_fraction)`
/// of its rows to the test partition, preserving class proportions.
pub fn stratified_split(labels: &[u8], test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::InvalidConfig(format!(
            "test_fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(SPLIT_STREAM);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for (class, name) in [(0u8, "human"), (1u8, "bot")] {
        let mut rows: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        rows.shuffle(&mut rng);

        let n_test = (rows.len() as f64 * test_fraction).round() as usize;
        let n_train = rows.len() - n_test.min(rows.len());
        if n_test < MIN_CLASS_ROWS || n_train < MIN_CLASS_ROWS {
            return Err(Error::InsufficientSamples(format!(
                "class {} has {} rows: {} train / {} test, need at least {} in each",
                name,
                rows.len(),
                n_train,
                n_test,
                MIN_CLASS_ROWS
            )));
        }
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(Split { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced(n: usize) -> Vec<u8> {
        (0..2 * n).map(|i| (i % 2) as u8).collect()
    }

    #[test]
    fn fifty_fifty_at_thirty_percent() {
        let labels = balanced(50);
        let split = stratified_split(&labels, 0.3, 42).unwrap();
        let bots = split.test.iter().filter(|&&i| labels[i] == 1).count();
        let humans = split.test.len() - bots;
        assert!((14..=16).contains(&bots));
        assert!((14..=16).contains(&humans));
        assert_eq!(split.train.len() + split.test.len(), 100);
    }

    #[test]
    fn partitions_are_disjoint_and_seeded() {
        let labels = balanced(20);
        let a = stratified_split(&labels, 0.25, 7).unwrap();
        let b = stratified_split(&labels, 0.25, 7).unwrap();
        assert_eq!(a, b);
        assert!(a.test.iter().all(|i| !a.train.contains(i)));
        assert_ne!(a, stratified_split(&labels, 0.25, 8).unwrap());
    }

    #[test]
    fn too_few_rows() {
        let labels = [0, 0, 0, 0, 0, 0, 1, 1, 1];
        assert!(matches!(
            stratified_split(&labels, 0.3, 1),
            Err(Error::InsufficientSamples(_))
        ));
    }

    #[test]
    fn fraction_bounds() {
        let labels = balanced(10);
        assert!(matches!(stratified_split(&labels, 0.0, 1), Err(Error::InvalidConfig(_))));
        assert!(matches!(stratified_split(&labels, 1.0, 1), Err(Error::InvalidConfig(_))));
        assert!(matches!(stratified_split(&labels, f64::NAN, 1), Err(Error::InvalidConfig(_))));
    }
}
