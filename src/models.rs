use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One certification record as loaded from the per-domain input files.
/// Everything beyond slug/name/issuer/domain is optional; the signal
/// extractors define the fallback for each missing field.
#[derive(Debug, Clone, Deserialize)]
pub struct Certification {
    pub slug: String,
    pub name: String,
    pub issuer: String,
    pub domain: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub exam_fee_usd: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub recommended_hours_min: Option<f64>,
    #[serde(default)]
    pub recommended_hours_max: Option<f64>,
    #[serde(default)]
    pub salary: Option<SalaryInfo>,
    #[serde(default)]
    pub job_postings: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalaryInfo {
    #[serde(default)]
    pub avg: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemandMetrics {
    pub slug: String,
    #[serde(default)]
    pub job_postings_30d: f64,
    #[serde(default)]
    pub job_postings_7d: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleSalary {
    #[serde(default)]
    pub median_usd: Option<f64>,
    #[serde(default)]
    pub p25_usd: Option<f64>,
    #[serde(default)]
    pub p75_usd: Option<f64>,
}

impl RoleSalary {
    /// Recorded median, or the quartile midpoint when only the spread is
    /// known.
    pub fn median_estimate(&self) -> Option<f64> {
        self.median_usd.or(match (self.p25_usd, self.p75_usd) {
            (Some(lo), Some(hi)) => Some((lo + hi) / 2.0),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Company {
    pub slug: String,
    pub name: String,
    /// Role name -> posting count observed for this company.
    #[serde(default)]
    pub top_roles: BTreeMap<String, i64>,
}

/// Raw per-entity signals for one run. Never persisted; only the scores
/// derived from it are.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalBundle {
    pub demand: f64,
    pub salary: f64,
    pub fee: f64,
    pub hours: f64,
    pub difficulty: f64,
    pub freshness: f64,
}

impl SignalBundle {
    /// Count of real (non-default) observations among the two signals that
    /// drive shrinkage and the confidence label.
    pub fn observations(&self) -> u32 {
        u32::from(self.demand > 0.0) + u32::from(self.salary > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub demand: f64,
    pub salary: f64,
    pub fee: f64,
    pub hours: f64,
}

/// One row of `rankings/today.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub global_rank: usize,
    pub slug: String,
    pub name: String,
    pub issuer: String,
    pub domain: String,
    pub score: f64,
    pub confidence: Confidence,
    pub rating: f64,
    pub job_postings: i64,
    pub trend: Trend,
    pub signals: SignalSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankPoint {
    pub date: NaiveDate,
    pub rank: usize,
}

/// Carried state between runs, keyed by slug. Read once at the start of a
/// run, replaced wholesale at the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendStore {
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub history: BTreeMap<String, Vec<RankPoint>>,
}

/// Signal breakdown attached to each recommendation for UI transparency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSignals {
    pub role_alignment: f64,
    pub issuer_affinity: f64,
    pub global_rank_norm: f64,
    pub market_demand: f64,
    pub difficulty_bonus: f64,
    pub cost_penalty: f64,
    pub tech_alignment: f64,
    pub best_role_match: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub slug: String,
    pub fit_score: f64,
    pub signals: FitSignals,
}

/// domain -> company slug -> top recommendations.
pub type RecommendationMap = BTreeMap<String, BTreeMap<String, Vec<Recommendation>>>;

impl Certification {
    /// Exam fee with the `cost` field taking precedence, 0 when neither is
    /// recorded.
    pub fn fee(&self) -> f64 {
        self.cost.or(self.exam_fee_usd).unwrap_or(0.0)
    }

    pub fn rating_or_default(&self) -> f64 {
        self.rating.unwrap_or(4.0)
    }
}
