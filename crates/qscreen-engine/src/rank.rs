//! Rank assembly over scored candidates.

use crate::scorer::ScoredMolecule;

/// Sort candidates by descending composite score (probability is
/// informational; ranking is score-driven) and assign 1-based ranks.
/// The sort is stable, so equal scores keep their input order.
pub fn assemble(mut scored: Vec<ScoredMolecule>) -> Vec<ScoredMolecule> {
    scored.sort_by(|a, b| {
        b.weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, s) in scored.iter_mut().enumerate() {
        s.rank = i + 1;
    }
    scored
}

/// The top-N view of an already-ranked list.
pub fn top_n(ranked: &[ScoredMolecule], n: usize) -> &[ScoredMolecule] {
    &ranked[..ranked.len().min(n)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::score_set;
    use crate::weights::WeightVector;
    use qscreen_common::Molecule;

    fn scored_with(scores: &[f64]) -> Vec<ScoredMolecule> {
        let molecules: Vec<Molecule> = scores
            .iter()
            .enumerate()
            .map(|(i, _)| Molecule::new(&format!("m{i}"), 300.0, 2.0, 1, 2))
            .collect();
        let mut scored = score_set(&molecules, &WeightVector::default(), None);
        for (s, &v) in scored.iter_mut().zip(scores.iter()) {
            s.weighted_score = v;
        }
        scored
    }

    #[test]
    fn test_rank_is_permutation_and_score_non_increasing() {
        let ranked = assemble(scored_with(&[0.4, 0.9, 0.1, 0.7, 0.7]));

        let mut ranks: Vec<usize> = ranked.iter().map(|s| s.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);

        for pair in ranked.windows(2) {
            assert!(pair[0].weighted_score >= pair[1].weighted_score);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = assemble(scored_with(&[0.5, 0.5, 0.5]));
        assert_eq!(ranked[0].molecule.name, "m0");
        assert_eq!(ranked[1].molecule.name, "m1");
        assert_eq!(ranked[2].molecule.name, "m2");
    }

    #[test]
    fn test_top_n_clamps_to_set_size() {
        let ranked = assemble(scored_with(&[0.3, 0.8]));
        assert_eq!(top_n(&ranked, 10).len(), 2);
        assert_eq!(top_n(&ranked, 1).len(), 1);
        assert_eq!(top_n(&ranked, 1)[0].molecule.name, "m1");
    }

    #[test]
    fn test_empty_input_yields_empty_ranking() {
        let ranked = assemble(vec![]);
        assert!(ranked.is_empty());
        assert!(top_n(&ranked, 5).is_empty());
    }
}
