//! Diversity and clustering estimation over the candidate set.
//!
//! Heuristic summaries of how spread-out a set is in descriptor space,
//! used downstream to gate confidence banners. The cluster estimate is
//! a single-pass leader grouping (Butina-style) over normalised
//! descriptor distance, not an exact clustering.

use qscreen_common::config::DiversityConfig;
use qscreen_common::Molecule;
use serde::{Deserialize, Serialize};

use crate::diffusion::similarity;

/// Two candidates closer than this (in 1 − similarity terms) fall into
/// the same cluster.
const CLUSTER_DISTANCE_THRESHOLD: f64 = 0.15;

/// Grid resolution per descriptor axis for chemical-space coverage.
const COVERAGE_BINS: usize = 4;

/// Categorical diversity label. The numeric cutoffs live in
/// [`DiversityConfig`]; this type never hardcodes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiversityLevel {
    Low,
    Medium,
    High,
}

/// Aggregate diversity metrics for one candidate set.
/// Recomputed whenever the set changes; read-only to consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversityMetrics {
    /// Mean pairwise normalised descriptor distance, in [0, 1].
    pub diversity_score: f64,
    /// Approximate number of distinct dense regions.
    pub cluster_estimate: usize,
    /// Fraction of the reachable normalised descriptor grid occupied.
    pub chemical_space_coverage: f64,
    pub level: DiversityLevel,
}

impl DiversityMetrics {
    fn empty(n: usize) -> Self {
        Self {
            diversity_score: 0.0,
            cluster_estimate: n,
            chemical_space_coverage: 0.0,
            level: DiversityLevel::Low,
        }
    }
}

/// Normalised position of a molecule in descriptor space, one axis per
/// kernel descriptor, each clamped to [0, 1].
fn descriptor_point(m: &Molecule) -> [f64; 4] {
    [
        (m.molecular_weight / 500.0).clamp(0.0, 1.0),
        ((m.logp + 5.0) / 10.0).clamp(0.0, 1.0),
        (m.h_bond_donors as f64 / 5.0).clamp(0.0, 1.0),
        (m.h_bond_acceptors as f64 / 10.0).clamp(0.0, 1.0),
    ]
}

fn distance(a: &Molecule, b: &Molecule) -> f64 {
    1.0 - similarity(a, b)
}

/// Leader clustering: each molecule joins the first existing leader
/// within the distance threshold, otherwise it founds a new cluster.
/// Clearly-separated additions can only add leaders; near-duplicates
/// always join an existing one.
fn estimate_clusters(molecules: &[Molecule]) -> usize {
    let mut leaders: Vec<&Molecule> = Vec::new();
    for m in molecules {
        let joined = leaders
            .iter()
            .any(|leader| distance(leader, m) < CLUSTER_DISTANCE_THRESHOLD);
        if !joined {
            leaders.push(m);
        }
    }
    leaders.len()
}

/// Occupied grid cells over the normalised descriptor box, relative to
/// the number of cells this set could occupy at most.
fn space_coverage(molecules: &[Molecule]) -> f64 {
    let total_cells = COVERAGE_BINS.pow(4);
    let mut occupied = std::collections::HashSet::new();

    for m in molecules {
        let point = descriptor_point(m);
        let cell: [usize; 4] = [
            bin(point[0]),
            bin(point[1]),
            bin(point[2]),
            bin(point[3]),
        ];
        occupied.insert(cell);
    }

    occupied.len() as f64 / molecules.len().min(total_cells) as f64
}

fn bin(value: f64) -> usize {
    ((value * COVERAGE_BINS as f64) as usize).min(COVERAGE_BINS - 1)
}

/// Compute diversity metrics for a candidate set.
/// Zero or one molecules → score 0, Low, without error.
pub fn estimate(molecules: &[Molecule], config: &DiversityConfig) -> DiversityMetrics {
    let n = molecules.len();
    if n <= 1 {
        return DiversityMetrics::empty(n);
    }

    let mut total_distance = 0.0;
    let mut pairs = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            total_distance += distance(&molecules[i], &molecules[j]);
            pairs += 1;
        }
    }
    let diversity_score = (total_distance / pairs as f64).clamp(0.0, 1.0);

    let level = if diversity_score >= config.high {
        DiversityLevel::High
    } else if diversity_score < config.low {
        DiversityLevel::Low
    } else {
        DiversityLevel::Medium
    };

    DiversityMetrics {
        diversity_score,
        cluster_estimate: estimate_clusters(molecules),
        chemical_space_coverage: space_coverage(molecules),
        level,
    }
}
