//! Engine configuration
//!
//! Tunable thresholds and weights for the decision engine and summary
//! aggregation. The penalty table and follow-up cap are invariants of
//! the engine, not configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the interview engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Similarity at or above this stops the follow-up loop
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,

    /// Score deltas within this band count as flat for trend purposes
    #[serde(default = "default_trend_tolerance")]
    pub trend_tolerance: f64,

    /// Weight of the theory component in the overall score
    #[serde(default = "default_theory_weight")]
    pub theory_weight: f64,

    /// Weight of the voice component in the overall score
    #[serde(default = "default_voice_weight")]
    pub voice_weight: f64,

    /// Voice component (0-100) assumed when no answer carries a voice score
    #[serde(default = "default_neutral_voice_score")]
    pub neutral_voice_score: f64,

    /// How many persistent gaps the summary surfaces
    #[serde(default = "default_top_gap_limit")]
    pub top_gap_limit: usize,

    /// Retries for a retryable collaborator failure before giving up
    #[serde(default = "default_max_collaborator_retries")]
    pub max_collaborator_retries: u32,
}

fn default_quality_threshold() -> f64 {
    0.8
}

fn default_trend_tolerance() -> f64 {
    2.0
}

fn default_theory_weight() -> f64 {
    0.7
}

fn default_voice_weight() -> f64 {
    0.3
}

fn default_neutral_voice_score() -> f64 {
    70.0
}

fn default_top_gap_limit() -> usize {
    5
}

fn default_max_collaborator_retries() -> u32 {
    2
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quality_threshold: default_quality_threshold(),
            trend_tolerance: default_trend_tolerance(),
            theory_weight: default_theory_weight(),
            voice_weight: default_voice_weight(),
            neutral_voice_score: default_neutral_voice_score(),
            top_gap_limit: default_top_gap_limit(),
            max_collaborator_retries: default_max_collaborator_retries(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML document, applying defaults for missing fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds and weights outside their meaningful ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.quality_threshold) {
            return Err(ConfigError::Invalid(format!(
                "quality_threshold must be in 0..=1, got {}",
                self.quality_threshold
            )));
        }
        if self.trend_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "trend_tolerance must be non-negative, got {}",
                self.trend_tolerance
            )));
        }
        if !(0.0..=100.0).contains(&self.neutral_voice_score) {
            return Err(ConfigError::Invalid(format!(
                "neutral_voice_score must be in 0..=100, got {}",
                self.neutral_voice_score
            )));
        }
        let weight_sum = self.theory_weight + self.voice_weight;
        if (weight_sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::Invalid(format!(
                "theory_weight + voice_weight must sum to 1.0, got {weight_sum}"
            )));
        }
        Ok(())
    }
}
