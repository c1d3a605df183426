//! The ranking run: one synchronous pass from loaded inputs to a fresh
//! rankings table and the next run's trend store. No incremental state;
//! the smoothed score keyed by slug is the only thing carried forward.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::config::RankingConfig;
use crate::models::{
    Certification, Confidence, DemandMetrics, RankPoint, RankingEntry, RoleSalary, SignalBundle,
    SignalSummary, Trend, TrendStore,
};
use crate::score::{self, CohortSamples};
use crate::signals;

/// Entries kept per slug in the trend store's rank history.
const HISTORY_RETENTION: usize = 14;

pub struct RankingInputs {
    pub certifications: Vec<Certification>,
    pub demand: HashMap<String, DemandMetrics>,
    pub salaries: BTreeMap<String, BTreeMap<String, RoleSalary>>,
}

pub struct RankOutcome {
    pub rankings: Vec<RankingEntry>,
    pub trends: TrendStore,
    pub domain_count: usize,
}

struct Scored<'a> {
    cert: &'a Certification,
    bundle: SignalBundle,
    smoothed: f64,
    confidence: Confidence,
    rank: usize,
}

/// Tie-break chain: score descending, then salary signal descending, then
/// fee ascending; slug as a last resort so the order is a strict total
/// order even for fully identical signals.
fn rank_order(a: &Scored, b: &Scored) -> Ordering {
    b.smoothed
        .partial_cmp(&a.smoothed)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.bundle
                .salary
                .partial_cmp(&a.bundle.salary)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| {
            a.bundle
                .fee
                .partial_cmp(&b.bundle.fee)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cert.slug.cmp(&b.cert.slug))
}

pub fn run(
    inputs: &RankingInputs,
    previous: &TrendStore,
    cfg: &RankingConfig,
    today: NaiveDate,
) -> RankOutcome {
    let mut domains: BTreeMap<&str, Vec<&Certification>> = BTreeMap::new();
    for cert in &inputs.certifications {
        domains.entry(cert.domain.as_str()).or_default().push(cert);
    }
    let domain_count = domains.len();

    let mut all: Vec<Scored> = Vec::with_capacity(inputs.certifications.len());

    for certs in domains.values() {
        let mut bundles: Vec<SignalBundle> = certs
            .iter()
            .map(|c| signals::extract(c, &inputs.demand, &inputs.salaries, &cfg.difficulty))
            .collect();
        score::apply_fee_floor(&mut bundles);

        let samples = CohortSamples::collect(&bundles);
        let raws: Vec<f64> = bundles
            .iter()
            .map(|b| score::raw_score(cfg, b, &samples.normalize(b)))
            .collect();
        let cohort_mean = raws.iter().sum::<f64>() / raws.len().max(1) as f64;

        let mut cohort: Vec<Scored> = certs
            .iter()
            .zip(bundles.iter().zip(&raws))
            .map(|(cert, (bundle, raw))| {
                let obs = bundle.observations();
                let shrunk = score::shrink(*raw, cohort_mean, obs);
                let smoothed =
                    score::smooth(shrunk, previous.scores.get(&cert.slug).copied(), cfg.alpha);
                Scored {
                    cert,
                    bundle: *bundle,
                    smoothed,
                    confidence: score::confidence(obs),
                    rank: 0,
                }
            })
            .collect();

        cohort.sort_by(rank_order);
        for (i, scored) in cohort.iter_mut().enumerate() {
            scored.rank = i + 1;
        }
        all.extend(cohort);
    }

    all.sort_by(rank_order);

    let mut trends = TrendStore {
        last_updated: Some(today.to_string()),
        ..TrendStore::default()
    };
    let mut rankings = Vec::with_capacity(all.len());

    for (i, scored) in all.iter().enumerate() {
        let global_rank = i + 1;
        let slug = &scored.cert.slug;

        let prior = previous.history.get(slug);
        let trend = match prior.and_then(|h| h.last()) {
            Some(last) if last.rank > global_rank => Trend::Up,
            Some(last) if last.rank < global_rank => Trend::Down,
            _ => Trend::Stable,
        };

        let mut history: Vec<RankPoint> = prior.cloned().unwrap_or_default();
        history.push(RankPoint {
            date: today,
            rank: global_rank,
        });
        if history.len() > HISTORY_RETENTION {
            history.drain(..history.len() - HISTORY_RETENTION);
        }

        trends.scores.insert(slug.clone(), scored.smoothed);
        trends.history.insert(slug.clone(), history);

        rankings.push(RankingEntry {
            rank: scored.rank,
            global_rank,
            slug: slug.clone(),
            name: scored.cert.name.clone(),
            issuer: scored.cert.issuer.clone(),
            domain: scored.cert.domain.clone(),
            score: round_to(scored.smoothed, 4),
            confidence: scored.confidence,
            rating: scored.cert.rating_or_default(),
            job_postings: scored.bundle.demand as i64,
            trend,
            signals: SignalSummary {
                demand: scored.bundle.demand,
                salary: scored.bundle.salary,
                fee: scored.bundle.fee,
                hours: scored.bundle.hours,
            },
        });
    }

    RankOutcome {
        rankings,
        trends,
        domain_count,
    }
}

pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
