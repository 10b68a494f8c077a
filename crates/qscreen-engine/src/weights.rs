//! Weight vector for composite compound scoring.

use qscreen_common::config::WeightConfig;
use serde::{Deserialize, Serialize};

/// The six-factor weight vector W.
///
/// Callers SHOULD supply weights summing to 1.0, but the scorer never
/// assumes it: every pass normalises a copy before the dot product, so
/// arbitrary non-negative weights still yield a sane composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightVector {
    /// Predicted binding affinity
    pub binding: f64,
    /// Inverted toxicity risk
    pub toxicity: f64,
    /// Aqueous solubility
    pub solubility: f64,
    /// Lipinski Rule-of-Five compliance
    pub lipinski: f64,
    /// Molecular-weight closeness to the reference weight
    pub mw_fit: f64,
    /// logP closeness to the reference logP
    pub logp_fit: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::from(&WeightConfig::default())
    }
}

impl From<&WeightConfig> for WeightVector {
    fn from(config: &WeightConfig) -> Self {
        Self {
            binding: config.binding,
            toxicity: config.toxicity,
            solubility: config.solubility,
            lipinski: config.lipinski,
            mw_fit: config.mw_fit,
            logp_fit: config.logp_fit,
        }
    }
}

impl WeightVector {
    /// Validate that all weights sum to ~1.0
    pub fn validate(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }

    fn sum(&self) -> f64 {
        self.binding + self.toxicity + self.solubility + self.lipinski + self.mw_fit + self.logp_fit
    }

    /// Return a copy normalised to sum to 1.0.
    /// An all-zero vector falls back to uniform weights rather than NaN.
    pub fn normalised(&self) -> Self {
        let sum = self.sum();
        if sum <= 0.0 {
            let uniform = 1.0 / 6.0;
            return Self {
                binding: uniform,
                toxicity: uniform,
                solubility: uniform,
                lipinski: uniform,
                mw_fit: uniform,
                logp_fit: uniform,
            };
        }
        Self {
            binding: self.binding / sum,
            toxicity: self.toxicity / sum,
            solubility: self.solubility / sum,
            lipinski: self.lipinski / sum,
            mw_fit: self.mw_fit / sum,
            logp_fit: self.logp_fit / sum,
        }
    }

    /// Convert to array for iteration.
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.binding,
            self.toxicity,
            self.solubility,
            self.lipinski,
            self.mw_fit,
            self.logp_fit,
        ]
    }

    /// Apply a disease-profile adjustment to a copy of the weights.
    /// Adjusted weights are floored at zero; normalisation happens at
    /// scoring time, not here.
    pub fn adjusted(&self, adjustment: &DiseaseAdjustment) -> Self {
        let apply = |w: f64, d: f64| -> f64 {
            match adjustment.mode {
                AdjustmentMode::Additive => (w + d).max(0.0),
                AdjustmentMode::Multiplicative => (w * d).max(0.0),
            }
        };
        Self {
            binding: apply(self.binding, adjustment.binding),
            toxicity: apply(self.toxicity, adjustment.toxicity),
            solubility: apply(self.solubility, adjustment.solubility),
            lipinski: apply(self.lipinski, adjustment.lipinski),
            mw_fit: apply(self.mw_fit, adjustment.mw_fit),
            logp_fit: apply(self.logp_fit, adjustment.logp_fit),
        }
    }
}

// ── Disease-profile adjustment ───────────────────────────────────────────────

/// How per-factor deltas combine with the base weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentMode {
    Additive,
    Multiplicative,
}

/// Caller-supplied per-factor weight deltas for an active disease profile.
/// The engine treats this as plain data; profiles themselves are owned by
/// the embedding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseAdjustment {
    pub mode: AdjustmentMode,
    pub binding: f64,
    pub toxicity: f64,
    pub solubility: f64,
    pub lipinski: f64,
    pub mw_fit: f64,
    pub logp_fit: f64,
}

impl DiseaseAdjustment {
    /// An adjustment that leaves the weights unchanged.
    pub fn identity() -> Self {
        Self {
            mode: AdjustmentMode::Multiplicative,
            binding: 1.0,
            toxicity: 1.0,
            solubility: 1.0,
            lipinski: 1.0,
            mw_fit: 1.0,
            logp_fit: 1.0,
        }
    }
}
