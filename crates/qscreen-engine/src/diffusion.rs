//! Similarity-diffusion over the candidate probability distribution
//! (the "quantum walk" — a discrete diffusion heuristic, not a quantum
//! algorithm).
//!
//! Each step moves probability mass towards structurally similar
//! candidates and renormalises, so mass is conserved. The full frame
//! history is kept for replay visualisation and stability metrics.

use qscreen_common::Molecule;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::normalise::{entropy, normalise_in_place};

/// Typical descriptor ranges used to normalise pairwise differences.
const MW_RANGE: f64 = 500.0;
const LOGP_RANGE: f64 = 5.0;
const DONOR_RANGE: f64 = 5.0;
const ACCEPTOR_RANGE: f64 = 10.0;

/// A frame is converged once its entropy drops below this fraction of
/// the maximum possible entropy (log2 n) for the candidate-set size.
const CONVERGENCE_FRACTION: f64 = 0.6;

/// Symmetric structural similarity kernel in [0, 1]:
/// 1 − mean normalised absolute descriptor difference.
pub fn similarity(a: &Molecule, b: &Molecule) -> f64 {
    let d_mw = ((a.molecular_weight - b.molecular_weight).abs() / MW_RANGE).min(1.0);
    let d_logp = ((a.logp - b.logp).abs() / LOGP_RANGE).min(1.0);
    let d_donors =
        ((a.h_bond_donors as f64 - b.h_bond_donors as f64).abs() / DONOR_RANGE).min(1.0);
    let d_acceptors =
        ((a.h_bond_acceptors as f64 - b.h_bond_acceptors as f64).abs() / ACCEPTOR_RANGE).min(1.0);

    1.0 - (d_mw + d_logp + d_donors + d_acceptors) / 4.0
}

/// One step of the diffusion process. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffusionFrame {
    pub step: usize,
    pub probabilities: Vec<f64>,
    pub entropy: f64,
    pub max_probability: f64,
    pub converged: bool,
}

/// Cooperative cancellation for long-running walks.
///
/// Checked between steps only, so cancelling never corrupts state:
/// frames computed so far remain valid and are returned as-is.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

fn make_frame(step: usize, probabilities: Vec<f64>) -> DiffusionFrame {
    let n = probabilities.len();
    let h = entropy(&probabilities);
    let max_probability = probabilities.iter().copied().fold(0.0, f64::max);
    // log2(1) = 0, so a singleton is trivially converged
    let max_entropy = (n as f64).log2();
    let converged = n <= 1 || h < CONVERGENCE_FRACTION * max_entropy;

    DiffusionFrame {
        step,
        probabilities,
        entropy: h,
        max_probability,
        converged,
    }
}

/// Run `steps` diffusion steps from an initial probability vector,
/// returning `steps + 1` frames (frame 0 is the undiffused input).
///
/// Per step: `P_new(i) = P(i) + α Σ_j sim(i,j) P(j)`, renormalised so
/// mass is conserved. Deterministic for identical inputs. With α = 0
/// every frame repeats the input distribution.
///
/// `initial` and `molecules` must have equal length; an empty set yields
/// a single empty frame. A cancelled token stops the walk between steps
/// and returns the frames computed so far.
pub fn run_walk(
    initial: &[f64],
    molecules: &[Molecule],
    steps: usize,
    alpha: f64,
    cancel: Option<&CancelToken>,
) -> Vec<DiffusionFrame> {
    debug_assert_eq!(initial.len(), molecules.len());

    let n = initial.len();
    let mut frames = Vec::with_capacity(steps + 1);
    frames.push(make_frame(0, initial.to_vec()));

    if n == 0 {
        return frames;
    }

    // O(n²) kernel, computed once per walk
    let mut kernel = vec![0.0; n * n];
    for i in 0..n {
        for j in i..n {
            let s = similarity(&molecules[i], &molecules[j]);
            kernel[i * n + j] = s;
            kernel[j * n + i] = s;
        }
    }

    let mut current = initial.to_vec();
    for step in 1..=steps {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                debug!(step, "diffusion walk cancelled; returning partial history");
                break;
            }
        }

        let mut next = vec![0.0; n];
        for i in 0..n {
            let inflow: f64 = (0..n).map(|j| kernel[i * n + j] * current[j]).sum();
            next[i] = current[i] + alpha * inflow;
        }
        normalise_in_place(&mut next);

        frames.push(make_frame(step, next.clone()));
        current = next;
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalise::softmax;

    fn candidates(n: usize) -> Vec<Molecule> {
        (0..n)
            .map(|i| {
                Molecule::new(
                    &format!("mol-{i}"),
                    250.0 + 40.0 * i as f64,
                    1.0 + 0.5 * i as f64,
                    (i % 4) as u32,
                    (i % 8) as u32,
                )
            })
            .collect()
    }

    #[test]
    fn test_similarity_is_symmetric_and_bounded() {
        let mols = candidates(5);
        for a in &mols {
            for b in &mols {
                let s = similarity(a, b);
                assert!((0.0..=1.0).contains(&s));
                assert!((s - similarity(b, a)).abs() < 1e-12);
            }
        }
        assert!((similarity(&mols[0], &mols[0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_walk_conserves_mass_every_step() {
        let mols = candidates(6);
        let initial = softmax(&[0.9, 0.4, 0.7, 0.1, 0.5, 0.3]);
        let frames = run_walk(&initial, &mols, 8, 0.1, None);

        assert_eq!(frames.len(), 9);
        for frame in &frames {
            let total: f64 = frame.probabilities.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "step {} lost mass", frame.step);
            assert!(frame.probabilities.iter().all(|&p| p >= 0.0));
        }
    }

    #[test]
    fn test_zero_alpha_is_identity_walk() {
        let mols = candidates(4);
        let initial = softmax(&[0.8, 0.2, 0.5, 0.1]);
        let frames = run_walk(&initial, &mols, 5, 0.0, None);

        for frame in &frames {
            for (a, b) in frame.probabilities.iter().zip(initial.iter()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_uniform_self_similar_input_stays_uniform() {
        // Identical descriptors → all similarities are 1.0
        let mols: Vec<Molecule> = (0..5).map(|_| Molecule::new("dup", 300.0, 2.0, 1, 2)).collect();
        let initial = vec![0.2; 5];
        let frames = run_walk(&initial, &mols, 6, 0.1, None);

        for frame in &frames {
            for &p in &frame.probabilities {
                assert!((p - 0.2).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_walk_is_deterministic() {
        let mols = candidates(5);
        let initial = softmax(&[0.3, 0.9, 0.1, 0.6, 0.4]);
        let a = run_walk(&initial, &mols, 10, 0.08, None);
        let b = run_walk(&initial, &mols, 10, 0.08, None);
        for (fa, fb) in a.iter().zip(b.iter()) {
            assert_eq!(fa.probabilities, fb.probabilities);
        }
    }

    #[test]
    fn test_empty_set_yields_single_empty_frame() {
        let frames = run_walk(&[], &[], 5, 0.1, None);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].probabilities.is_empty());
        assert_eq!(frames[0].entropy, 0.0);
    }

    #[test]
    fn test_convergence_flag_tracks_entropy_threshold() {
        // A sharply peaked distribution over 4 candidates: entropy well
        // below 0.6 × log2(4) = 1.2 bits
        let mols = candidates(4);
        let frames = run_walk(&[0.97, 0.01, 0.01, 0.01], &mols, 0, 0.1, None);
        assert!(frames[0].converged);

        // Uniform over 4: entropy 2.0 bits > 1.2, not converged
        let frames = run_walk(&[0.25; 4], &mols, 0, 0.1, None);
        assert!(!frames[0].converged);
    }

    #[test]
    fn test_cancelled_token_returns_partial_history() {
        let mols = candidates(4);
        let initial = softmax(&[0.5, 0.2, 0.8, 0.3]);
        let token = CancelToken::new();
        token.cancel();

        let frames = run_walk(&initial, &mols, 50, 0.1, Some(&token));
        // Only the initial frame; nothing corrupted
        assert_eq!(frames.len(), 1);
        let total: f64 = frames[0].probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
