use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

/// Produces the initial value of one weight cell. Called once per weight at
/// construction time.
pub type WeightGenerator = Box<dyn FnMut() -> f64>;

/// Weight-initialisation policy.
///
/// Kept separate from the architecture so that a `LayerSpec` can be stored as
/// JSON while the generator itself stays a closure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Initializer {
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// Uniform on `[-0.5, 0.5)`.
    Centered,
    /// Every weight starts at the same value. Mostly useful in tests.
    Constant { value: f64 },
    /// He initialization: N(0, sqrt(2 / fan_in)). Suited to ReLU layers.
    He { fan_in: usize },
    /// Xavier (Glorot) initialization: N(0, sqrt(1 / fan_in)).
    Xavier { fan_in: usize },
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer::Centered
    }
}

impl Initializer {
    /// Generator seeded from OS entropy.
    pub fn generator(self) -> WeightGenerator {
        self.generator_from(StdRng::from_entropy())
    }

    /// Deterministic generator; identical seeds yield identical weights.
    pub fn generator_seeded(self, seed: u64) -> WeightGenerator {
        self.generator_from(StdRng::seed_from_u64(seed))
    }

    fn generator_from(self, mut rng: StdRng) -> WeightGenerator {
        match self {
            Initializer::Uniform { low, high } => Box::new(move || low + rng.gen::<f64>() * (high - low)),
            Initializer::Centered => Box::new(move || rng.gen::<f64>() - 0.5),
            Initializer::Constant { value } => Box::new(move || value),
            Initializer::He { fan_in } => {
                let std_dev = (2.0 / fan_in.max(1) as f64).sqrt();
                Box::new(move || sample_standard_normal(&mut rng) * std_dev)
            }
            Initializer::Xavier { fan_in } => {
                let std_dev = (1.0 / fan_in.max(1) as f64).sqrt();
                Box::new(move || sample_standard_normal(&mut rng) * std_dev)
            }
        }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // Both uniforms on (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stays_in_range() {
        let mut next = Initializer::Uniform { low: -0.1, high: 0.3 }.generator_seeded(7);
        for _ in 0..1000 {
            let w = next();
            assert!((-0.1..0.3).contains(&w));
        }
    }

    #[test]
    fn seeded_generators_repeat() {
        let mut a = Initializer::He { fan_in: 16 }.generator_seeded(42);
        let mut b = Initializer::He { fan_in: 16 }.generator_seeded(42);
        for _ in 0..10 {
            assert_eq!(a(), b());
        }
    }

    #[test]
    fn constant_is_constant() {
        let mut next = Initializer::Constant { value: 0.25 }.generator();
        assert_eq!(next(), 0.25);
        assert_eq!(next(), 0.25);
    }

    #[test]
    fn initializer_json_round_trip() {
        let init = Initializer::Xavier { fan_in: 784 };
        let json = serde_json::to_string(&init).unwrap();
        assert_eq!(json, r#"{"type":"Xavier","fan_in":784}"#);
        let back: Initializer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, init);
    }
}
