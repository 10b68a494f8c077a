//! Screening configuration.
//!
//! Embedding applications define weights, diffusion settings, and output
//! options via YAML/JSON config or UI controls. Every section carries
//! serde defaults so a partial file is valid.

use serde::{Deserialize, Serialize};

/// Complete screening pass configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Scoring factor weights
    #[serde(default)]
    pub weights: WeightConfig,

    /// Quantum-walk diffusion settings
    #[serde(default)]
    pub diffusion: DiffusionConfig,

    /// Diversity level thresholds
    #[serde(default)]
    pub diversity: DiversityConfig,

    /// Output options
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            diffusion: DiffusionConfig::default(),
            diversity: DiversityConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ── Weight Configuration ──────────────────────────────────────────────────────

/// Scoring weights for the six composite factors.
/// Weights SHOULD sum to 1.0; the scorer normalises defensively either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Weight for predicted binding affinity
    #[serde(default = "default_binding_weight")]
    pub binding: f64,

    /// Weight for inverted toxicity risk
    #[serde(default = "default_toxicity_weight")]
    pub toxicity: f64,

    /// Weight for aqueous solubility
    #[serde(default = "default_solubility_weight")]
    pub solubility: f64,

    /// Weight for Lipinski Rule-of-Five compliance
    #[serde(default = "default_lipinski_weight")]
    pub lipinski: f64,

    /// Weight for molecular-weight closeness to the reference weight
    #[serde(default = "default_mw_weight")]
    pub mw_fit: f64,

    /// Weight for logP closeness to the reference logP
    #[serde(default = "default_logp_weight")]
    pub logp_fit: f64,
}

fn default_binding_weight() -> f64 { 0.30 }
fn default_toxicity_weight() -> f64 { 0.20 }
fn default_solubility_weight() -> f64 { 0.15 }
fn default_lipinski_weight() -> f64 { 0.15 }
fn default_mw_weight() -> f64 { 0.10 }
fn default_logp_weight() -> f64 { 0.10 }

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            binding: default_binding_weight(),
            toxicity: default_toxicity_weight(),
            solubility: default_solubility_weight(),
            lipinski: default_lipinski_weight(),
            mw_fit: default_mw_weight(),
            logp_fit: default_logp_weight(),
        }
    }
}

impl WeightConfig {
    /// Validate weights sum to 1.0
    pub fn validate(&self) -> bool {
        let sum = self.binding
            + self.toxicity
            + self.solubility
            + self.lipinski
            + self.mw_fit
            + self.logp_fit;
        (sum - 1.0).abs() < 1e-6
    }

    /// Normalize weights to sum to 1.0
    pub fn normalize(&mut self) {
        let sum = self.binding
            + self.toxicity
            + self.solubility
            + self.lipinski
            + self.mw_fit
            + self.logp_fit;

        if sum > 0.0 {
            self.binding /= sum;
            self.toxicity /= sum;
            self.solubility /= sum;
            self.lipinski /= sum;
            self.mw_fit /= sum;
            self.logp_fit /= sum;
        }
    }
}

// ── Diffusion Configuration ───────────────────────────────────────────────────

/// Settings for the similarity-diffusion ("quantum walk") stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffusionConfig {
    /// Diffusion rate per step; small and constant across steps
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Number of diffusion steps
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Caller-side guardrail: skip diffusion for candidate sets larger
    /// than this. The engine itself has no hard cap.
    #[serde(default = "default_auto_disable")]
    pub auto_disable_above: usize,
}

fn default_alpha() -> f64 { 0.1 }
fn default_steps() -> usize { 10 }
fn default_auto_disable() -> usize { 1000 }

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            steps: default_steps(),
            auto_disable_above: default_auto_disable(),
        }
    }
}

// ── Diversity Configuration ───────────────────────────────────────────────────

/// Thresholds mapping the diversity score onto Low/Medium/High.
/// This is the single home of that policy; consumers never hardcode cutoffs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversityConfig {
    /// Diversity score at or above this is High
    #[serde(default = "default_high_threshold")]
    pub high: f64,

    /// Diversity score below this is Low
    #[serde(default = "default_low_threshold")]
    pub low: f64,
}

fn default_high_threshold() -> f64 { 0.4 }
fn default_low_threshold() -> f64 { 0.25 }

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            high: default_high_threshold(),
            low: default_low_threshold(),
        }
    }
}

// ── Output Configuration ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of top candidates to surface
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize { 10 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self { top_n: default_top_n() }
    }
}

// ── Helper Methods ─────────────────────────────────────────────────────────────

impl ScreenConfig {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let config = WeightConfig::default();
        assert!(config.validate(), "Default weights must sum to 1.0");
    }

    #[test]
    fn test_weights_normalize() {
        let mut config = WeightConfig {
            binding: 2.0,
            toxicity: 2.0,
            solubility: 0.0,
            lipinski: 0.0,
            mw_fit: 0.0,
            logp_fit: 0.0,
        };
        assert!(!config.validate());
        config.normalize();
        assert!(config.validate());
        assert!((config.binding - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_diversity_thresholds_ordered() {
        let config = DiversityConfig::default();
        assert!(config.low < config.high);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ScreenConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ScreenConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.diffusion.steps, parsed.diffusion.steps);
        assert!((config.weights.binding - parsed.weights.binding).abs() < 1e-12);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed: ScreenConfig = serde_yaml::from_str("diffusion:\n  steps: 25\n").unwrap();
        assert_eq!(parsed.diffusion.steps, 25);
        assert!((parsed.diffusion.alpha - 0.1).abs() < 1e-12);
        assert_eq!(parsed.output.top_n, 10);
    }
}
