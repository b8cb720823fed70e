/// Squared-error loss used to seed the backward pass.
pub struct MseLoss;

impl MseLoss {
    /// mean((predicted - expected)²); `0.0` for empty vectors.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        predicted.iter().zip(expected)
            .map(|(p, e)| (p - e).powi(2))
            .sum::<f64>() / predicted.len() as f64
    }

    /// Output gradient seeds: predicted - expected, one per output.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected)
            .map(|(p, e)| p - e)
            .collect()
    }
}
