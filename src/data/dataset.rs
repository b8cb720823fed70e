use rand::seq::SliceRandom;
use rand::Rng;

/// One labelled pixel matrix, flattened row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitSample {
    pub pixels: Vec<f64>,
    pub digit: u8,
}

impl DigitSample {
    pub fn new(pixels: Vec<f64>, digit: u8) -> Self {
        DigitSample { pixels, digit }
    }
}

/// Samples partitioned into a training and a testing set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DigitDataSet {
    pub training: Vec<DigitSample>,
    pub testing: Vec<DigitSample>,
}

impl DigitDataSet {
    pub fn new(training: Vec<DigitSample>, testing: Vec<DigitSample>) -> Self {
        DigitDataSet { training, testing }
    }

    /// Splits `samples` so that the last `test_fraction` of them (rounded
    /// down) become the testing set.
    pub fn split(mut samples: Vec<DigitSample>, test_fraction: f64) -> Self {
        let fraction = test_fraction.clamp(0.0, 1.0);
        let test_len = (samples.len() as f64 * fraction) as usize;
        let testing = samples.split_off(samples.len() - test_len);
        DigitDataSet { training: samples, testing }
    }

    /// Concatenates several data sets. With `shuffle`, both merged sets are
    /// shuffled afterwards.
    pub fn combine<R: Rng + ?Sized>(sets: Vec<DigitDataSet>, shuffle: bool, rng: &mut R) -> Self {
        let mut combined = DigitDataSet::default();
        for set in sets {
            combined.training.extend(set.training);
            combined.testing.extend(set.testing);
        }
        if shuffle {
            combined.training.shuffle(rng);
            combined.testing.shuffle(rng);
        }
        combined
    }

    /// Keeps at most `training` and `testing` samples of each set.
    pub fn truncate(&mut self, training: usize, testing: usize) {
        self.training.truncate(training);
        self.testing.truncate(testing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn samples(n: u8) -> Vec<DigitSample> {
        (0..n).map(|d| DigitSample::new(vec![d as f64], d % 10)).collect()
    }

    #[test]
    fn split_takes_tail_for_testing() {
        let set = DigitDataSet::split(samples(10), 0.3);
        assert_eq!(set.training.len(), 7);
        assert_eq!(set.testing.len(), 3);
        assert_eq!(set.testing[0].digit, 7);
    }

    #[test]
    fn combine_keeps_every_sample() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = DigitDataSet::new(samples(4), samples(2));
        let b = DigitDataSet::new(samples(3), samples(1));
        let combined = DigitDataSet::combine(vec![a, b], true, &mut rng);
        assert_eq!(combined.training.len(), 7);
        assert_eq!(combined.testing.len(), 3);
        let mut digits: Vec<u8> = combined.training.iter().map(|s| s.digit).collect();
        digits.sort_unstable();
        assert_eq!(digits, vec![0, 0, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn truncate_limits_both_sets() {
        let mut set = DigitDataSet::new(samples(5), samples(5));
        set.truncate(2, 10);
        assert_eq!(set.training.len(), 2);
        assert_eq!(set.testing.len(), 5);
    }
}
