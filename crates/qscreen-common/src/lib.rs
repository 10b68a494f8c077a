//! qscreen-common — Shared types, errors, and configuration used across all qscreen crates.

pub mod client;
pub mod config;
pub mod error;
pub mod molecule;

// Re-export commonly used types
pub use config::{DiffusionConfig, DiversityConfig, OutputConfig, ScreenConfig, WeightConfig};
pub use error::{QscreenError, Result};
pub use molecule::Molecule;
