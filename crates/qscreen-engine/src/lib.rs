//! qscreen-engine — Probabilistic compound scoring and diversity engine.
//!
//! One screening pass flows strictly top-to-bottom:
//! 1. Weighted composite scoring of each candidate
//! 2. Softmax normalisation of scores into a probability distribution
//! 3. Similarity-diffusion ("quantum walk") over the distribution
//! 4. Diversity and clustering estimation over the candidate set
//! 5. Rank assembly by composite score
//!
//! Every stage is a synchronous pure function over in-memory slices; no
//! stage mutates its inputs, and each pass allocates fresh outputs.

pub mod diffusion;
pub mod diversity;
pub mod normalise;
pub mod pipeline;
pub mod rank;
pub mod scorer;
pub mod weights;

pub use diffusion::{CancelToken, DiffusionFrame};
pub use diversity::{DiversityLevel, DiversityMetrics};
pub use pipeline::{ScreenOutcome, ScreeningPass};
pub use scorer::{FactorScores, ScoredMolecule};
pub use weights::{AdjustmentMode, DiseaseAdjustment, WeightVector};
