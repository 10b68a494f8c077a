//! One-pass orchestrator: score → softmax → diffusion → diversity → rank.

use chrono::{DateTime, Utc};
use qscreen_common::{Molecule, ScreenConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::diffusion::{run_walk, CancelToken, DiffusionFrame};
use crate::diversity::{self, DiversityMetrics};
use crate::normalise::softmax;
use crate::rank;
use crate::scorer::{score_set, ScoredMolecule};
use crate::weights::{DiseaseAdjustment, WeightVector};

/// The complete result of one screening pass. A fresh immutable snapshot;
/// the next pass supersedes it rather than mutating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenOutcome {
    /// All candidates, ranked by composite score.
    pub ranked: Vec<ScoredMolecule>,
    /// Diffusion history; a single frame when diffusion was skipped.
    pub frames: Vec<DiffusionFrame>,
    pub diversity: DiversityMetrics,
    pub generated_at: DateTime<Utc>,
}

impl ScreenOutcome {
    /// The top-N candidates per the configured output size.
    pub fn top(&self, n: usize) -> &[ScoredMolecule] {
        rank::top_n(&self.ranked, n)
    }
}

/// Stateless screening pass runner. Holds only configuration; every call
/// to [`run`](Self::run) is a pure computation over its inputs.
pub struct ScreeningPass {
    config: ScreenConfig,
}

impl ScreeningPass {
    pub fn new(config: ScreenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Run a full pass over the candidate set.
    pub fn run(
        &self,
        molecules: &[Molecule],
        adjustment: Option<&DiseaseAdjustment>,
    ) -> ScreenOutcome {
        self.run_with_cancel(molecules, adjustment, None)
    }

    /// Run a full pass, aborting the diffusion stage between steps if the
    /// token is cancelled. Frames computed so far remain in the outcome.
    pub fn run_with_cancel(
        &self,
        molecules: &[Molecule],
        adjustment: Option<&DiseaseAdjustment>,
        cancel: Option<&CancelToken>,
    ) -> ScreenOutcome {
        let n = molecules.len();
        info!(candidates = n, "running screening pass");

        let weights = WeightVector::from(&self.config.weights);
        let mut scored = score_set(molecules, &weights, adjustment);

        let scores: Vec<f64> = scored.iter().map(|s| s.weighted_score).collect();
        let initial = softmax(&scores);

        // Auto-disable is an embedding-application guardrail; the walk
        // itself stays correct at any n.
        let diffusion = &self.config.diffusion;
        let frames = if n > diffusion.auto_disable_above {
            warn!(
                candidates = n,
                threshold = diffusion.auto_disable_above,
                "candidate set above diffusion guardrail; skipping walk"
            );
            run_walk(&initial, molecules, 0, diffusion.alpha, None)
        } else {
            run_walk(&initial, molecules, diffusion.steps, diffusion.alpha, cancel)
        };

        // Final (possibly diffused) distribution backfills probabilities
        let final_probs = &frames[frames.len() - 1].probabilities;
        for (s, &p) in scored.iter_mut().zip(final_probs.iter()) {
            s.probability = p;
        }

        let diversity = diversity::estimate(molecules, &self.config.diversity);
        debug!(
            diversity = diversity.diversity_score,
            clusters = diversity.cluster_estimate,
            frames = frames.len(),
            "screening pass complete"
        );

        ScreenOutcome {
            ranked: rank::assemble(scored),
            frames,
            diversity,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diversity::DiversityLevel;

    fn pass() -> ScreeningPass {
        ScreeningPass::new(ScreenConfig::default())
    }

    fn candidates() -> Vec<Molecule> {
        let mut a = Molecule::new("alpha", 310.0, 2.2, 1, 3);
        a.binding_affinity = Some(0.9);
        a.toxicity_risk = Some(0.1);
        let mut b = Molecule::new("beta", 450.0, 4.1, 3, 7);
        b.binding_affinity = Some(0.4);
        b.toxicity_risk = Some(0.6);
        let mut c = Molecule::new("gamma", 180.0, 0.5, 0, 2);
        c.binding_affinity = Some(0.6);
        vec![a, b, c]
    }

    #[test]
    fn test_full_pass_invariants() {
        let outcome = pass().run(&candidates(), None);

        assert_eq!(outcome.ranked.len(), 3);
        let mass: f64 = outcome.ranked.iter().map(|s| s.probability).sum();
        assert!((mass - 1.0).abs() < 1e-9);

        // steps + 1 frames, mass conserved in each
        assert_eq!(outcome.frames.len(), 11);
        for frame in &outcome.frames {
            let total: f64 = frame.probabilities.iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
        }

        for (i, s) in outcome.ranked.iter().enumerate() {
            assert_eq!(s.rank, i + 1);
        }
    }

    #[test]
    fn test_single_candidate_scenario() {
        let mut config = ScreenConfig::default();
        config.weights.binding = 1.0;
        config.weights.toxicity = 0.0;
        config.weights.solubility = 0.0;
        config.weights.lipinski = 0.0;
        config.weights.mw_fit = 0.0;
        config.weights.logp_fit = 0.0;

        let mut m = Molecule::new("solo", 300.0, 2.0, 1, 2);
        m.binding_affinity = Some(0.8);

        let outcome = ScreeningPass::new(config).run(&[m], None);
        let top = &outcome.ranked[0];
        assert!((top.weighted_score - 0.8).abs() < 1e-9);
        assert!((top.probability - 1.0).abs() < 1e-9);
        assert_eq!(top.rank, 1);
    }

    #[test]
    fn test_empty_set_is_not_an_error() {
        let outcome = pass().run(&[], None);
        assert!(outcome.ranked.is_empty());
        assert_eq!(outcome.frames.len(), 1);
        assert!(outcome.frames[0].probabilities.is_empty());
        assert_eq!(outcome.diversity.cluster_estimate, 0);
        assert_eq!(outcome.diversity.level, DiversityLevel::Low);
    }

    #[test]
    fn test_guardrail_skips_diffusion_above_threshold() {
        let mut config = ScreenConfig::default();
        config.diffusion.auto_disable_above = 2;
        let outcome = ScreeningPass::new(config).run(&candidates(), None);
        // Initial frame only
        assert_eq!(outcome.frames.len(), 1);
        let mass: f64 = outcome.ranked.iter().map(|s| s.probability).sum();
        assert!((mass - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_inputs_are_not_mutated_across_passes() {
        let molecules = candidates();
        let snapshot = serde_json::to_string(&molecules).unwrap();

        let runner = pass();
        let first = runner.run(&molecules, None);
        let second = runner.run(&molecules, None);

        assert_eq!(snapshot, serde_json::to_string(&molecules).unwrap());
        for (a, b) in first.ranked.iter().zip(second.ranked.iter()) {
            assert_eq!(a.molecule.name, b.molecule.name);
            assert!((a.weighted_score - b.weighted_score).abs() < 1e-12);
            assert!((a.probability - b.probability).abs() < 1e-12);
        }
    }

    #[test]
    fn test_top_view_respects_configured_size() {
        let outcome = pass().run(&candidates(), None);
        assert_eq!(outcome.top(2).len(), 2);
        assert_eq!(outcome.top(2)[0].rank, 1);
    }
}
