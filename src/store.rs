//! Whole-document persistence for the data directory. Inputs are read
//! fully into memory at run start; outputs land via temp-file-then-rename,
//! leaving the previous snapshot intact if a run is interrupted.
//!
//! Only the certification collection is required. Every auxiliary table
//! degrades to empty when its file is missing.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{
    Certification, Company, DemandMetrics, RankingEntry, RecommendationMap, RoleSalary, TrendStore,
};
use crate::recommend::AffinityTable;

pub fn certifications_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("certifications")
}

pub fn rankings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("rankings").join("today.json")
}

pub fn trends_path(data_dir: &Path) -> PathBuf {
    data_dir.join("rankings").join("trends.json")
}

pub fn recommendations_path(data_dir: &Path) -> PathBuf {
    data_dir.join("companies").join("recommendations.json")
}

fn affinity_path(data_dir: &Path) -> PathBuf {
    data_dir.join("affinity").join("issuer_company_affinity.csv")
}

/// Load every per-domain certification file in sorted filename order.
/// Index files are shard bookkeeping, not records.
pub fn load_certifications(data_dir: &Path) -> anyhow::Result<Vec<Certification>> {
    let dir = certifications_dir(data_dir);
    let entries = fs::read_dir(&dir)
        .with_context(|| format!("failed to read certifications from {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension().is_some_and(|ext| ext == "json")
                && !p
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("index"))
        })
        .collect();
    paths.sort();

    let mut certifications = Vec::new();
    for path in paths {
        let batch: Vec<Certification> = read_json(&path)?;
        certifications.extend(batch);
    }

    anyhow::ensure!(
        !certifications.is_empty(),
        "no certification records found under {}",
        dir.display()
    );
    Ok(certifications)
}

pub fn load_demand(data_dir: &Path) -> anyhow::Result<HashMap<String, DemandMetrics>> {
    let path = data_dir.join("demand").join("metrics.json");
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let metrics: Vec<DemandMetrics> = read_json(&path)?;
    Ok(metrics.into_iter().map(|m| (m.slug.clone(), m)).collect())
}

pub fn load_role_salaries(
    data_dir: &Path,
) -> anyhow::Result<BTreeMap<String, BTreeMap<String, RoleSalary>>> {
    let path = data_dir.join("salaries").join("role_salaries.json");
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    read_json(&path)
}

pub fn load_companies(data_dir: &Path) -> anyhow::Result<BTreeMap<String, Vec<Company>>> {
    let path = data_dir.join("companies").join("by_domain.json");
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    read_json(&path)
}

#[derive(Debug, Deserialize)]
struct AffinityRow {
    company: String,
    issuer: String,
    affinity_score: f64,
}

pub fn load_affinity(data_dir: &Path) -> anyhow::Result<AffinityTable> {
    let path = affinity_path(data_dir);
    let mut table = AffinityTable::new();
    if !path.exists() {
        return Ok(table);
    }

    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    for row in reader.deserialize() {
        let row: AffinityRow =
            row.with_context(|| format!("invalid affinity row in {}", path.display()))?;
        table
            .entry(row.company.trim().to_string())
            .or_default()
            .insert(row.issuer.trim().to_string(), row.affinity_score);
    }
    Ok(table)
}

pub fn load_trends(data_dir: &Path) -> anyhow::Result<TrendStore> {
    let path = trends_path(data_dir);
    if !path.exists() {
        return Ok(TrendStore::default());
    }
    read_json(&path)
}

pub fn load_rankings(data_dir: &Path) -> anyhow::Result<Vec<RankingEntry>> {
    let path = rankings_path(data_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_json(&path)
}

pub fn save_rankings(data_dir: &Path, rankings: &[RankingEntry]) -> anyhow::Result<()> {
    write_json(&rankings_path(data_dir), &rankings)
}

pub fn save_trends(data_dir: &Path, trends: &TrendStore) -> anyhow::Result<()> {
    write_json(&trends_path(data_dir), trends)
}

pub fn save_recommendations(
    data_dir: &Path,
    recommendations: &RecommendationMap,
) -> anyhow::Result<()> {
    write_json(&recommendations_path(data_dir), recommendations)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("no parent directory for {}", path.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let tmp = path.with_extension("json.tmp");
    let body = serde_json::to_string_pretty(value)?;
    fs::write(&tmp, body).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move {} into place", tmp.display()))?;
    Ok(())
}
