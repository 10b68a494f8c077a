//! Composite score computation for compound candidates.

use qscreen_common::Molecule;
use serde::{Deserialize, Serialize};

use crate::weights::{DiseaseAdjustment, WeightVector};

/// Reference descriptor values for the triangular fit factors.
/// A candidate at the reference scores 1.0; the factor falls off linearly
/// to 0.0 at the edge of the tolerance window.
const REFERENCE_MW: f64 = 300.0;
const MW_TOLERANCE: f64 = 200.0;
const REFERENCE_LOGP: f64 = 2.0;
const LOGP_TOLERANCE: f64 = 3.0;

/// Missing scoring input → neutral midpoint, so one absent field does
/// not zero out an otherwise viable candidate.
const NEUTRAL_FACTOR: f64 = 0.5;

/// Factor value for molecules that violate the Rule of Five.
const LIPINSKI_PENALTY_FACTOR: f64 = 0.4;

/// Normalised per-factor contributions, all in [0, 1].
///
/// A closed, fixed set of named factors: consumers can rely on exactly
/// these six contribution names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FactorScores {
    pub binding: f64,
    pub toxicity: f64,
    pub solubility: f64,
    pub lipinski: f64,
    pub mw_fit: f64,
    pub logp_fit: f64,
}

impl FactorScores {
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
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Compute the six normalised factors for one molecule.
/// Out-of-range inputs are clamped, never rejected.
pub fn compute_factors(molecule: &Molecule) -> FactorScores {
    let binding = clamp01(molecule.binding_affinity.unwrap_or(NEUTRAL_FACTOR));
    let toxicity = clamp01(1.0 - molecule.toxicity_risk.unwrap_or(NEUTRAL_FACTOR));
    let solubility = clamp01(molecule.solubility.unwrap_or(NEUTRAL_FACTOR));

    let lipinski = if molecule.lipinski_compliant() {
        1.0
    } else {
        LIPINSKI_PENALTY_FACTOR
    };

    let mw_fit = clamp01(1.0 - (molecule.molecular_weight - REFERENCE_MW).abs() / MW_TOLERANCE);
    let logp_fit = clamp01(1.0 - (molecule.logp - REFERENCE_LOGP).abs() / LOGP_TOLERANCE);

    FactorScores {
        binding,
        toxicity,
        solubility,
        lipinski,
        mw_fit,
        logp_fit,
    }
}

/// Compute the composite score for one molecule:
/// `score = Σ weight_i × factor_i` over normalised weights.
///
/// If a disease adjustment is active it is applied to a copy of the
/// weights before normalisation; the caller's vector is never mutated.
pub fn score_molecule(
    molecule: &Molecule,
    weights: &WeightVector,
    adjustment: Option<&DiseaseAdjustment>,
) -> (f64, FactorScores) {
    let factors = compute_factors(molecule);

    let effective = match adjustment {
        Some(adj) => weights.adjusted(adj).normalised(),
        None => weights.normalised(),
    };

    let weighted_score: f64 = factors
        .as_array()
        .iter()
        .zip(effective.as_array().iter())
        .map(|(f, w)| f * w)
        .sum();

    (weighted_score, factors)
}

/// A molecule with its per-pass scoring results.
/// Superseded, never mutated, on the next pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMolecule {
    pub molecule: Molecule,
    pub weighted_score: f64,
    /// Share of probability mass in [0, 1]; sums to 1 across the set.
    pub probability: f64,
    pub breakdown: FactorScores,
    /// 1-based rank assigned by the rank assembler; 0 until assigned.
    pub rank: usize,
}

/// Score every candidate in the set. Probability and rank are filled in
/// by the later pipeline stages.
pub fn score_set(
    molecules: &[Molecule],
    weights: &WeightVector,
    adjustment: Option<&DiseaseAdjustment>,
) -> Vec<ScoredMolecule> {
    molecules
        .iter()
        .map(|m| {
            let (weighted_score, breakdown) = score_molecule(m, weights, adjustment);
            ScoredMolecule {
                molecule: m.clone(),
                weighted_score,
                probability: 0.0,
                breakdown,
                rank: 0,
            }
        })
        .collect()
}
