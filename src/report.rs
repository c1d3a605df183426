use std::fmt::Write;

use crate::models::{Confidence, RankingEntry, TrendStore};

#[derive(Debug, Clone)]
pub struct DomainSummary {
    pub domain: String,
    pub count: usize,
    pub avg_score: f64,
    pub high_confidence: usize,
}

#[derive(Debug, Clone)]
pub struct RankMove {
    pub slug: String,
    pub from: usize,
    pub to: usize,
}

impl RankMove {
    pub fn delta(&self) -> i64 {
        self.from as i64 - self.to as i64
    }
}

pub fn summarize_by_domain(rankings: &[RankingEntry]) -> Vec<DomainSummary> {
    let mut map: std::collections::BTreeMap<String, (usize, f64, usize)> =
        std::collections::BTreeMap::new();

    for entry in rankings {
        let bucket = map.entry(entry.domain.clone()).or_insert((0, 0.0, 0));
        bucket.0 += 1;
        bucket.1 += entry.score;
        if entry.confidence == Confidence::High {
            bucket.2 += 1;
        }
    }

    let mut summaries: Vec<DomainSummary> = map
        .into_iter()
        .map(|(domain, (count, total_score, high_confidence))| DomainSummary {
            domain,
            count,
            avg_score: if count == 0 {
                0.0
            } else {
                total_score / count as f64
            },
            high_confidence,
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

/// Largest global-rank changes between the last two recorded points.
pub fn biggest_movers(trends: &TrendStore, limit: usize) -> Vec<RankMove> {
    let mut moves: Vec<RankMove> = trends
        .history
        .iter()
        .filter_map(|(slug, points)| {
            let n = points.len();
            if n < 2 {
                return None;
            }
            let (prev, latest) = (&points[n - 2], &points[n - 1]);
            if prev.rank == latest.rank {
                return None;
            }
            Some(RankMove {
                slug: slug.clone(),
                from: prev.rank,
                to: latest.rank,
            })
        })
        .collect();

    moves.sort_by(|a, b| b.delta().abs().cmp(&a.delta().abs()).then(a.slug.cmp(&b.slug)));
    moves.truncate(limit);
    moves
}

pub fn build_report(rankings: &[RankingEntry], trends: &TrendStore) -> String {
    let summaries = summarize_by_domain(rankings);
    let movers = biggest_movers(trends, 5);

    let mut output = String::new();
    let generated = trends.last_updated.as_deref().unwrap_or("unknown date");

    let _ = writeln!(output, "# Certification Ranking Report");
    let _ = writeln!(
        output,
        "Generated from the rankings snapshot of {generated}"
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Domain Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No ranked certifications in this snapshot.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} certifications (avg score {:.2}, {} high-confidence)",
                summary.domain, summary.count, summary.avg_score, summary.high_confidence
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Certifications");

    if rankings.is_empty() {
        let _ = writeln!(output, "No ranked certifications in this snapshot.");
    } else {
        for entry in rankings.iter().take(10) {
            let _ = writeln!(
                output,
                "- #{} {} ({}, {}) score {:.4}, {} postings",
                entry.global_rank,
                entry.name,
                entry.issuer,
                entry.domain,
                entry.score,
                entry.job_postings
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Biggest Movers");

    if movers.is_empty() {
        let _ = writeln!(output, "No rank movement recorded yet.");
    } else {
        for m in movers.iter() {
            let direction = if m.delta() > 0 { "up" } else { "down" };
            let _ = writeln!(
                output,
                "- {} moved {} {} places (#{} -> #{})",
                m.slug,
                direction,
                m.delta().abs(),
                m.from,
                m.to
            );
        }
    }

    output
}
