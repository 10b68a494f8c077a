//! PubChem compound search via the PUG REST property tables.

use async_trait::async_trait;
use qscreen_common::client::AllowlistClient;
use qscreen_common::error::{QscreenError, Result};
use qscreen_common::Molecule;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::TtlCache;

const PUBCHEM_BASE: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
const PROPERTY_LIST: &str =
    "Title,MolecularFormula,MolecularWeight,XLogP,HBondDonorCount,HBondAcceptorCount,TPSA,RotatableBondCount,CanonicalSMILES";
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Source of compound records for the screening engine.
///
/// Implementations can use:
/// - PubChem PUG REST (remote)
/// - Bundled dataset files (local, see [`crate::dataset`])
/// - Mock data (testing)
#[async_trait]
pub trait MoleculeProvider: Send + Sync {
    /// Search compounds by name, returning at most `limit` records.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Molecule>>;
}

// ── PubChem response shapes ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct PropertyResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties")]
    properties: Vec<CompoundProperties>,
}

#[derive(Deserialize)]
struct CompoundProperties {
    #[serde(rename = "CID")]
    cid: Option<u64>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "MolecularFormula")]
    molecular_formula: Option<String>,
    // PubChem serialises weights as strings
    #[serde(rename = "MolecularWeight")]
    molecular_weight: Option<String>,
    #[serde(rename = "XLogP")]
    xlogp: Option<f64>,
    #[serde(rename = "HBondDonorCount")]
    h_bond_donor_count: Option<u32>,
    #[serde(rename = "HBondAcceptorCount")]
    h_bond_acceptor_count: Option<u32>,
    #[serde(rename = "TPSA")]
    tpsa: Option<f64>,
    #[serde(rename = "RotatableBondCount")]
    rotatable_bond_count: Option<u32>,
    #[serde(rename = "CanonicalSMILES")]
    canonical_smiles: Option<String>,
}

fn molecule_from_properties(props: &CompoundProperties) -> Option<Molecule> {
    let molecular_weight: f64 = props.molecular_weight.as_ref()?.parse().ok()?;
    let logp = props.xlogp?;

    Some(Molecule {
        id: Uuid::new_v4(),
        cid: props.cid,
        name: props
            .title
            .clone()
            .unwrap_or_else(|| format!("CID {}", props.cid.unwrap_or(0))),
        smiles: props.canonical_smiles.clone(),
        formula: props.molecular_formula.clone(),
        molecular_weight,
        logp,
        h_bond_donors: props.h_bond_donor_count.unwrap_or(0),
        h_bond_acceptors: props.h_bond_acceptor_count.unwrap_or(0),
        tpsa: props.tpsa,
        rotatable_bonds: props.rotatable_bond_count,
        binding_affinity: None,
        toxicity_risk: None,
        solubility: None,
    })
}

// ── PubChem client ────────────────────────────────────────────────────────────

/// PubChem search client with an injected TTL response cache.
pub struct PubChemClient {
    client: AllowlistClient,
    cache: Mutex<TtlCache<String, Vec<Molecule>>>,
}

impl PubChemClient {
    pub fn new() -> Result<Self> {
        Self::with_cache_ttl(DEFAULT_CACHE_TTL)
    }

    pub fn with_cache_ttl(ttl: Duration) -> Result<Self> {
        Ok(Self {
            client: AllowlistClient::new()?,
            cache: Mutex::new(TtlCache::new(ttl)),
        })
    }
}

#[async_trait]
impl MoleculeProvider for PubChemClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Molecule>> {
        let cache_key = query.to_lowercase();
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&cache_key) {
                debug!(query, "PubChem cache hit");
                return Ok(hit.into_iter().take(limit).collect());
            }
        }

        info!(query, "fetching compounds from PubChem");
        let url = format!(
            "{}/compound/name/{}/property/{}/JSON",
            PUBCHEM_BASE, query, PROPERTY_LIST
        );

        let response = self.client.get(&url)?.send().await?;
        if !response.status().is_success() {
            return Err(QscreenError::Dataset(format!(
                "PubChem returned {} for query '{}'",
                response.status(),
                query
            )));
        }

        let body: PropertyResponse = response.json().await?;
        let mut molecules = Vec::new();
        for props in &body.property_table.properties {
            match molecule_from_properties(props) {
                Some(m) => molecules.push(m),
                None => warn!(cid = ?props.cid, "skipping compound with missing descriptors"),
            }
        }

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(cache_key, molecules.clone());
        }

        Ok(molecules.into_iter().take(limit).collect())
    }
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Mock provider with hardcoded results for unit tests.
pub struct MockMoleculeProvider {
    data: std::collections::HashMap<String, Vec<Molecule>>,
}

impl MockMoleculeProvider {
    pub fn new() -> Self {
        Self {
            data: std::collections::HashMap::new(),
        }
    }

    /// Register the result set for a query.
    pub fn with(mut self, query: &str, molecules: Vec<Molecule>) -> Self {
        self.data.insert(query.to_lowercase(), molecules);
        self
    }
}

impl Default for MockMoleculeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MoleculeProvider for MockMoleculeProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Molecule>> {
        Ok(self
            .data
            .get(&query.to_lowercase())
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .collect())
    }
}
