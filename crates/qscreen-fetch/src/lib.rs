//! qscreen-fetch — External collaborators around the scoring engine:
//! public-database compound search, bundled dataset loading, and a
//! TTL response cache. The engine itself never does I/O; everything
//! here completes before a screening pass begins.

pub mod cache;
pub mod dataset;
pub mod pubchem;

pub use cache::TtlCache;
pub use pubchem::{MockMoleculeProvider, MoleculeProvider, PubChemClient};
