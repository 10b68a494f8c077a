//! Bundled dataset loading (JSON and CSV).
//!
//! Field names follow the locally prepared dataset exports
//! (`processed_dataset.json` / `cleaned_dataset.csv`): snake_case
//! descriptor columns with `xlogp` for logP and `polar_area` for TPSA.
//! Rows missing required descriptors are skipped, not fatal.

use qscreen_common::error::{QscreenError, Result};
use qscreen_common::Molecule;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// One row of a prepared dataset file.
#[derive(Debug, Deserialize)]
pub struct DatasetRecord {
    pub name: Option<String>,
    pub compound_cid: Option<u64>,
    pub smiles: Option<String>,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<f64>,
    pub xlogp: Option<f64>,
    pub h_bond_donor_count: Option<u32>,
    pub h_bond_acceptor_count: Option<u32>,
    pub polar_area: Option<f64>,
    pub rotatable_bond_count: Option<u32>,
    pub binding_score: Option<f64>,
    pub toxicity: Option<f64>,
    pub solubility: Option<f64>,
}

fn to_molecule(record: DatasetRecord) -> Option<Molecule> {
    let molecular_weight = record.molecular_weight?;
    let logp = record.xlogp?;

    Some(Molecule {
        id: Uuid::new_v4(),
        cid: record.compound_cid,
        name: record.name.unwrap_or_else(|| "unknown".to_string()),
        smiles: record.smiles,
        formula: record.molecular_formula,
        molecular_weight,
        logp,
        h_bond_donors: record.h_bond_donor_count.unwrap_or(0),
        h_bond_acceptors: record.h_bond_acceptor_count.unwrap_or(0),
        tpsa: record.polar_area,
        rotatable_bonds: record.rotatable_bond_count,
        binding_affinity: record.binding_score,
        toxicity_risk: record.toxicity,
        solubility: record.solubility,
    })
}

fn collect(records: Vec<DatasetRecord>, origin: &str) -> Vec<Molecule> {
    let total = records.len();
    let molecules: Vec<Molecule> = records.into_iter().filter_map(to_molecule).collect();
    if molecules.len() < total {
        warn!(
            skipped = total - molecules.len(),
            origin, "skipped dataset rows with missing required descriptors"
        );
    }
    info!(loaded = molecules.len(), origin, "dataset loaded");
    molecules
}

/// Load a prepared JSON dataset (an array of records).
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<Molecule>> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| QscreenError::Dataset(format!("cannot read dataset file: {}", e)))?;
    let records: Vec<DatasetRecord> = serde_json::from_str(&content)?;
    Ok(collect(records, "json"))
}

/// Load a prepared CSV dataset. Unparseable rows are skipped with a warning.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Molecule>> {
    let mut reader = csv::Reader::from_path(&path)
        .map_err(|e| QscreenError::Dataset(format!("cannot open dataset file: {}", e)))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<DatasetRecord>() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping unparseable dataset row: {}", e),
        }
    }
    Ok(collect(records, "csv"))
}
