//! Signal extraction. Every extractor is total: missing or malformed source
//! data degrades to a documented default instead of failing the run.

use std::collections::{BTreeMap, HashMap};

use crate::config::DifficultyWeights;
use crate::models::{Certification, DemandMetrics, RoleSalary, SignalBundle};

/// Parsed free-form duration expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationSpec {
    Hours(f64),
    Weeks(f64),
    Days(f64),
}

impl DurationSpec {
    /// Parse strings like "40 hours", "2 weeks", "10 days". Returns None on
    /// anything else; the caller falls back to the explicit hour range.
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        let amount = |unit: &str| -> Option<f64> {
            lower
                .replace(&format!("{unit}s"), "")
                .replace(unit, "")
                .trim()
                .parse()
                .ok()
        };
        if lower.contains("hour") {
            amount("hour").map(DurationSpec::Hours)
        } else if lower.contains("week") {
            amount("week").map(DurationSpec::Weeks)
        } else if lower.contains("day") {
            amount("day").map(DurationSpec::Days)
        } else {
            None
        }
    }

    /// Assumes a 40-hour week and an 8-hour day.
    pub fn total_hours(&self) -> f64 {
        match self {
            DurationSpec::Hours(h) => *h,
            DurationSpec::Weeks(w) => w * 40.0,
            DurationSpec::Days(d) => d * 8.0,
        }
    }
}

/// Job postings over the trailing 30 days: demand table first, then the
/// record's own posting count, then 0.
pub fn demand_signal(cert: &Certification, demand: &HashMap<String, DemandMetrics>) -> f64 {
    if let Some(metrics) = demand.get(&cert.slug) {
        return metrics.job_postings_30d;
    }
    cert.job_postings.unwrap_or(0.0)
}

/// Salary proxy: the record's own average when present, else the median of
/// the role medians mapped to its domain, else 0.
pub fn salary_signal(
    cert: &Certification,
    salaries: &BTreeMap<String, BTreeMap<String, RoleSalary>>,
) -> f64 {
    if let Some(avg) = cert.salary.as_ref().and_then(|s| s.avg) {
        return avg;
    }

    let Some(roles) = salaries.get(&cert.domain) else {
        return 0.0;
    };
    let medians: Vec<f64> = roles
        .values()
        .filter_map(|r| r.median_estimate())
        .filter(|m| *m > 0.0)
        .collect();
    median(&medians).unwrap_or(0.0)
}

/// Fee and study-hour friction. Hours come from the duration string when it
/// parses, else the midpoint of the recommended hour range, else 0.
pub fn friction_signals(cert: &Certification) -> (f64, f64) {
    let fee = cert.fee();

    let parsed = cert
        .duration
        .as_deref()
        .and_then(DurationSpec::parse)
        .map(|d| d.total_hours());
    let hours = parsed.unwrap_or_else(|| {
        let lo = cert.recommended_hours_min.unwrap_or(0.0);
        let hi = cert.recommended_hours_max.unwrap_or(lo);
        (lo + hi) / 2.0
    });

    (fee, hours)
}

/// Placeholder freshness bonus; always producible.
pub fn freshness_signal(_cert: &Certification) -> f64 {
    1.0
}

/// Full bundle for one certification against the loaded lookup tables.
pub fn extract(
    cert: &Certification,
    demand: &HashMap<String, DemandMetrics>,
    salaries: &BTreeMap<String, BTreeMap<String, RoleSalary>>,
    difficulty: &DifficultyWeights,
) -> SignalBundle {
    let (fee, hours) = friction_signals(cert);
    SignalBundle {
        demand: demand_signal(cert, demand),
        salary: salary_signal(cert, salaries),
        fee,
        hours,
        difficulty: difficulty.for_level(cert.level.as_deref()),
        freshness: freshness_signal(cert),
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
