//! Probability normalisation helpers shared by the softmax and
//! diffusion stages.

/// Numerically-stable softmax: `P(i) = e^{s_i − max} / Σ_j e^{s_j − max}`.
///
/// Empty input yields an empty vector; a single candidate gets
/// probability 1.0.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return vec![];
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut probs: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    normalise_in_place(&mut probs);
    probs
}

/// Rescale a non-negative vector to sum to 1.0, conserving relative mass.
/// An all-zero vector falls back to the uniform distribution rather than
/// dividing by zero.
pub fn normalise_in_place(probs: &mut [f64]) {
    if probs.is_empty() {
        return;
    }

    let total: f64 = probs.iter().sum();
    if total > 0.0 {
        for p in probs.iter_mut() {
            *p /= total;
        }
    } else {
        let uniform = 1.0 / probs.len() as f64;
        for p in probs.iter_mut() {
            *p = uniform;
        }
    }
}

/// Shannon entropy in bits, with the `0·log(0) = 0` convention.
pub fn entropy(probs: &[f64]) -> f64 {
    probs
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum()
}
