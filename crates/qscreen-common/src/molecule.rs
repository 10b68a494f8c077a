//! Compound records as fetched from PubChem/ChEMBL or bundled datasets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chemical compound candidate.
///
/// Descriptors are opaque numeric inputs supplied by the fetch layer;
/// the scoring engine only ever reads them. Required descriptors
/// (molecular weight, logP, donor/acceptor counts) are non-optional;
/// scoring inputs may be absent and are defaulted by the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// PubChem compound identifier, when the record came from PubChem.
    pub cid: Option<u64>,
    pub name: String,
    pub smiles: Option<String>,
    pub formula: Option<String>,

    pub molecular_weight: f64,
    pub logp: f64,
    pub h_bond_donors: u32,
    pub h_bond_acceptors: u32,
    pub tpsa: Option<f64>,
    pub rotatable_bonds: Option<u32>,

    /// Predicted binding affinity in [0, 1].
    pub binding_affinity: Option<f64>,
    /// Toxicity risk in [0, 1]; higher is worse.
    pub toxicity_risk: Option<f64>,
    /// Aqueous solubility estimate in [0, 1].
    pub solubility: Option<f64>,
}

impl Molecule {
    /// Create a molecule from the four required descriptors.
    pub fn new(name: &str, molecular_weight: f64, logp: f64, donors: u32, acceptors: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            cid: None,
            name: name.to_string(),
            smiles: None,
            formula: None,
            molecular_weight,
            logp,
            h_bond_donors: donors,
            h_bond_acceptors: acceptors,
            tpsa: None,
            rotatable_bonds: None,
            binding_affinity: None,
            toxicity_risk: None,
            solubility: None,
        }
    }

    /// Lipinski Rule-of-Five compliance, derived from the four
    /// Rule-of-Five descriptors. Never stored independently.
    pub fn lipinski_compliant(&self) -> bool {
        self.molecular_weight <= 500.0
            && self.logp <= 5.0
            && self.h_bond_donors <= 5
            && self.h_bond_acceptors <= 10
    }
}
