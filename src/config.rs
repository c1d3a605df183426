//! Scoring configuration. Defaults match the production weight scheme; a
//! `ranking.json` file in the data directory overrides any subset of them.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Weights for the five normalized terms of the raw score. They share a
/// budget of 1.0; the difficulty bonus sits outside it.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub demand: f64,
    pub salary: f64,
    pub fee: f64,
    pub hours: f64,
    pub freshness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            demand: 0.45,
            salary: 0.25,
            fee: 0.15,
            hours: 0.10,
            freshness: 0.05,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.demand + self.salary + self.fee + self.hours + self.freshness
    }
}

/// Additive difficulty bonus per certification level.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DifficultyWeights {
    pub foundational: f64,
    pub associate: f64,
    pub professional: f64,
    pub expert: f64,
    pub specialty: f64,
}

impl Default for DifficultyWeights {
    fn default() -> Self {
        Self {
            foundational: 0.05,
            associate: 0.10,
            professional: 0.15,
            expert: 0.20,
            specialty: 0.15,
        }
    }
}

impl DifficultyWeights {
    /// Unrecognized or missing levels fall back to the associate weight.
    pub fn for_level(&self, level: Option<&str>) -> f64 {
        match level.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("foundational") => self.foundational,
            Some("associate") => self.associate,
            Some("professional") => self.professional,
            Some("expert") => self.expert,
            Some("specialty") => self.specialty,
            _ => self.associate,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub weights: Weights,
    pub difficulty: DifficultyWeights,
    /// EMA smoothing factor, tuned for a ~14-period feel.
    pub alpha: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            difficulty: DifficultyWeights::default(),
            alpha: 0.5,
        }
    }
}

impl RankingConfig {
    /// Load `ranking.json` from the data directory if present, defaults
    /// otherwise. A present-but-malformed file is an error; silently
    /// reverting to defaults would mask a typo in a tuning change.
    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let path = data_dir.join("ranking.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid ranking config in {}", path.display()))
    }

    pub fn with_alpha(mut self, alpha: Option<f64>) -> Self {
        if let Some(alpha) = alpha {
            self.alpha = alpha.clamp(0.0, 1.0);
        }
        self
    }
}
