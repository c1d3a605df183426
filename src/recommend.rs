//! Company-certification fit scoring. Fully derived: recomputed from
//! scratch each run from the current rankings snapshot, no carried state.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    Certification, Company, DemandMetrics, FitSignals, RankingEntry, Recommendation,
    RecommendationMap,
};
use crate::rank::round_to;
use crate::roles::{RoleClassifier, RoleProfile};

/// Entries kept per company.
const TOP_K: usize = 3;

/// Fixed fit weights; cost is the one subtractive term.
const W_ROLE_ALIGNMENT: f64 = 0.40;
const W_ISSUER_AFFINITY: f64 = 0.25;
const W_GLOBAL_RANK: f64 = 0.20;
const W_MARKET_DEMAND: f64 = 0.10;
const W_DIFFICULTY: f64 = 0.05;
const W_COST_PENALTY: f64 = 0.05;

/// company name -> issuer -> affinity in [0, 1].
pub type AffinityTable = BTreeMap<String, BTreeMap<String, f64>>;

pub struct RecommendationInputs<'a> {
    pub certifications: &'a [Certification],
    pub rankings: &'a [RankingEntry],
    pub demand: &'a HashMap<String, DemandMetrics>,
    pub companies: &'a BTreeMap<String, Vec<Company>>,
    pub affinity: &'a AffinityTable,
}

#[derive(Debug, Clone, Default)]
struct Alignment {
    score: f64,
    tech: f64,
    best_role: Option<String>,
}

/// Blend of keyword overlap and tech-stack alignment against one role,
/// best role taken across the company's observed top roles.
fn role_alignment(
    cert: &Certification,
    company: &Company,
    domain: &str,
    classifier: &dyn RoleClassifier,
) -> Alignment {
    let text = format!("{} {}", cert.name, cert.issuer).to_lowercase();
    let mut best = Alignment::default();

    for role in company.top_roles.keys() {
        let Some(profile) = classifier.profile_for_role(domain, role) else {
            continue;
        };

        let keyword_hits = profile.keywords.iter().filter(|k| text.contains(**k)).count();
        let keyword_score = (keyword_hits as f64 / profile.keywords.len().max(1) as f64).min(1.0);
        let tech = tech_alignment(&text, profile);
        let combined = keyword_score * 0.6 + tech * 0.4;

        if best.best_role.is_none() || combined > best.score {
            best = Alignment {
                score: combined,
                tech,
                best_role: Some(role.clone()),
            };
        }
    }

    best
}

/// Pattern hits count double against generic tech-stack hits.
fn tech_alignment(cert_text: &str, profile: &RoleProfile) -> f64 {
    let stack_hits = profile
        .tech_stack
        .iter()
        .filter(|t| cert_text.contains(**t))
        .count();
    let pattern_hits = profile
        .cert_patterns
        .iter()
        .filter(|p| cert_text.contains(**p))
        .count();

    let denom = (profile.cert_patterns.len() * 2 + profile.tech_stack.len()).max(1);
    ((pattern_hits * 2 + stack_hits) as f64 / denom as f64).min(1.0)
}

/// Tiered demand signal from 30-day posting counts.
fn market_demand(slug: &str, demand: &HashMap<String, DemandMetrics>) -> f64 {
    let postings = demand.get(slug).map_or(0.0, |d| d.job_postings_30d);
    match postings {
        p if p > 500.0 => 1.0,
        p if p > 100.0 => 0.8,
        p if p > 50.0 => 0.6,
        p if p > 10.0 => 0.4,
        p if p > 0.0 => 0.2,
        _ => 0.0,
    }
}

/// Difficulty bonus for recommendations; a separate scale from the ranking
/// pipeline's additive difficulty weight.
fn difficulty_bonus(cert: &Certification) -> f64 {
    match cert.level.as_deref().map(str::to_lowercase).as_deref() {
        Some("foundational") => 0.2,
        Some("associate") => 0.4,
        Some("professional") => 0.8,
        Some("expert") => 1.0,
        Some("specialty") => 0.6,
        _ => 0.4,
    }
}

fn issuer_affinity(company_name: &str, issuer: &str, affinity: &AffinityTable) -> f64 {
    affinity
        .get(company_name)
        .and_then(|issuers| issuers.get(issuer))
        .copied()
        .unwrap_or(0.0)
}

/// Min-max over ranking scores; slugs outside the snapshot score 0.
struct RankNorm {
    scores: HashMap<String, f64>,
    min: f64,
    max: f64,
}

impl RankNorm {
    fn new(rankings: &[RankingEntry]) -> Self {
        let scores: HashMap<String, f64> =
            rankings.iter().map(|r| (r.slug.clone(), r.score)).collect();
        let min = scores.values().copied().fold(f64::INFINITY, f64::min);
        let max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
        Self { scores, min, max }
    }

    fn get(&self, slug: &str) -> f64 {
        let Some(score) = self.scores.get(slug) else {
            return 0.0;
        };
        (score - self.min) / (self.max - self.min + 1e-9)
    }
}

/// Fee penalty normalized within the domain's fee spread.
struct FeePenalty {
    min: f64,
    max: f64,
}

impl FeePenalty {
    fn for_domain(certs: &[&Certification]) -> Self {
        let fees: Vec<f64> = certs.iter().map(|c| c.fee()).filter(|f| *f > 0.0).collect();
        let min = fees.iter().copied().fold(f64::INFINITY, f64::min);
        let max = fees.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self { min, max }
    }

    fn get(&self, cert: &Certification) -> f64 {
        let fee = cert.fee();
        if fee <= 0.0 || !self.min.is_finite() {
            return 0.0;
        }
        (fee - self.min) / (self.max - self.min + 1e-9)
    }
}

pub fn build(inputs: &RecommendationInputs, classifier: &dyn RoleClassifier) -> RecommendationMap {
    let rank_norm = RankNorm::new(inputs.rankings);
    let mut recommendations = RecommendationMap::new();

    for (domain, companies) in inputs.companies {
        let domain_certs: Vec<&Certification> = inputs
            .certifications
            .iter()
            .filter(|c| &c.domain == domain)
            .collect();
        if domain_certs.is_empty() {
            continue;
        }
        let fee_penalty = FeePenalty::for_domain(&domain_certs);

        let domain_recs = recommendations.entry(domain.clone()).or_default();
        for company in companies {
            let mut scored: Vec<Recommendation> = domain_certs
                .iter()
                .map(|cert| score_pair(cert, company, domain, inputs, classifier, &rank_norm, &fee_penalty))
                .collect();

            scored.sort_by(|a, b| {
                b.fit_score
                    .partial_cmp(&a.fit_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.slug.cmp(&b.slug))
            });
            scored.truncate(TOP_K);
            domain_recs.insert(company.slug.clone(), scored);
        }
    }

    recommendations
}

fn score_pair(
    cert: &Certification,
    company: &Company,
    domain: &str,
    inputs: &RecommendationInputs,
    classifier: &dyn RoleClassifier,
    rank_norm: &RankNorm,
    fee_penalty: &FeePenalty,
) -> Recommendation {
    let alignment = role_alignment(cert, company, domain, classifier);
    let affinity = issuer_affinity(&company.name, &cert.issuer, inputs.affinity);
    let rank = rank_norm.get(&cert.slug);
    let demand = market_demand(&cert.slug, inputs.demand);
    let difficulty = difficulty_bonus(cert);
    let cost = fee_penalty.get(cert);

    let fit = W_ROLE_ALIGNMENT * alignment.score
        + W_ISSUER_AFFINITY * affinity
        + W_GLOBAL_RANK * rank
        + W_MARKET_DEMAND * demand
        + W_DIFFICULTY * difficulty
        - W_COST_PENALTY * cost;

    Recommendation {
        slug: cert.slug.clone(),
        fit_score: round_to(fit, 4),
        signals: FitSignals {
            role_alignment: round_to(alignment.score, 3),
            issuer_affinity: round_to(affinity, 3),
            global_rank_norm: round_to(rank, 3),
            market_demand: round_to(demand, 3),
            difficulty_bonus: round_to(difficulty, 3),
            cost_penalty: round_to(cost, 3),
            tech_alignment: round_to(alignment.tech, 3),
            best_role_match: alignment.best_role,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::KeywordClassifier;

    fn sample_cert(slug: &str, name: &str, issuer: &str, fee: Option<f64>) -> Certification {
        Certification {
            slug: slug.to_string(),
            name: name.to_string(),
            issuer: issuer.to_string(),
            domain: "CS/IT".to_string(),
            level: Some("associate".to_string()),
            cost: None,
            exam_fee_usd: fee,
            duration: None,
            recommended_hours_min: None,
            recommended_hours_max: None,
            salary: None,
            job_postings: None,
            rating: None,
        }
    }

    fn sample_company(slug: &str, name: &str, roles: &[&str]) -> Company {
        Company {
            slug: slug.to_string(),
            name: name.to_string(),
            top_roles: roles.iter().map(|r| (r.to_string(), 10)).collect(),
        }
    }

    fn sample_inputs<'a>(
        certs: &'a [Certification],
        companies: &'a BTreeMap<String, Vec<Company>>,
        demand: &'a HashMap<String, DemandMetrics>,
        affinity: &'a AffinityTable,
    ) -> RecommendationInputs<'a> {
        RecommendationInputs {
            certifications: certs,
            rankings: &[],
            demand,
            companies,
            affinity,
        }
    }

    #[test]
    fn market_demand_is_tiered() {
        let mut demand = HashMap::new();
        for (slug, postings) in [
            ("a", 600.0),
            ("b", 200.0),
            ("c", 60.0),
            ("d", 20.0),
            ("e", 5.0),
        ] {
            demand.insert(
                slug.to_string(),
                DemandMetrics {
                    slug: slug.to_string(),
                    job_postings_30d: postings,
                    job_postings_7d: 0.0,
                },
            );
        }
        assert_eq!(market_demand("a", &demand), 1.0);
        assert_eq!(market_demand("b", &demand), 0.8);
        assert_eq!(market_demand("c", &demand), 0.6);
        assert_eq!(market_demand("d", &demand), 0.4);
        assert_eq!(market_demand("e", &demand), 0.2);
        assert_eq!(market_demand("missing", &demand), 0.0);
    }

    #[test]
    fn pattern_hits_count_double() {
        let profile = RoleProfile {
            role: "Cloud Engineer",
            keywords: &[],
            tech_stack: &["docker", "terraform"],
            cert_patterns: &["aws", "azure"],
        };
        // one pattern hit out of 2*2 + 2 possible points
        assert!((tech_alignment("aws certified", &profile) - 2.0 / 6.0).abs() < 1e-9);
        // one stack hit scores half a pattern hit
        assert!((tech_alignment("docker fundamentals", &profile) - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn aligned_cert_beats_unrelated_cert() {
        let certs = vec![
            sample_cert("aws-saa", "AWS Certified Solutions Architect", "Amazon Web Services", Some(150.0)),
            sample_cert("floral-design", "Floral Design Fundamentals", "Craft Guild", Some(150.0)),
        ];
        let mut companies = BTreeMap::new();
        companies.insert(
            "CS/IT".to_string(),
            vec![sample_company("acme", "Acme", &["Cloud Engineer"])],
        );
        let demand = HashMap::new();
        let affinity = AffinityTable::new();
        let inputs = sample_inputs(&certs, &companies, &demand, &affinity);

        let recs = build(&inputs, &KeywordClassifier);
        let acme = &recs["CS/IT"]["acme"];
        assert_eq!(acme[0].slug, "aws-saa");
        assert!(acme[0].fit_score > acme[1].fit_score);
        assert_eq!(acme[0].signals.best_role_match.as_deref(), Some("Cloud Engineer"));
        assert!(acme[0].signals.role_alignment > 0.0);
    }

    #[test]
    fn issuer_affinity_feeds_the_fit_score() {
        let certs = vec![
            sample_cert("cert-a", "Widget Professional", "Issuer A", None),
            sample_cert("cert-b", "Widget Professional II", "Issuer B", None),
        ];
        let mut companies = BTreeMap::new();
        companies.insert(
            "CS/IT".to_string(),
            vec![sample_company("acme", "Acme", &[])],
        );
        let demand = HashMap::new();
        let mut affinity = AffinityTable::new();
        affinity
            .entry("Acme".to_string())
            .or_default()
            .insert("Issuer B".to_string(), 0.9);
        let inputs = sample_inputs(&certs, &companies, &demand, &affinity);

        let recs = build(&inputs, &KeywordClassifier);
        let acme = &recs["CS/IT"]["acme"];
        assert_eq!(acme[0].slug, "cert-b");
        assert_eq!(acme[0].signals.issuer_affinity, 0.9);
        assert_eq!(acme[1].signals.issuer_affinity, 0.0);
    }

    #[test]
    fn lists_are_capped_and_sorted() {
        let certs: Vec<Certification> = (0..6)
            .map(|i| {
                sample_cert(
                    &format!("cert-{i}"),
                    &format!("Cert {i}"),
                    "Issuer",
                    Some(100.0 + i as f64 * 50.0),
                )
            })
            .collect();
        let mut companies = BTreeMap::new();
        companies.insert(
            "CS/IT".to_string(),
            vec![sample_company("acme", "Acme", &["Cloud Engineer"])],
        );
        let demand = HashMap::new();
        let affinity = AffinityTable::new();
        let inputs = sample_inputs(&certs, &companies, &demand, &affinity);

        let recs = build(&inputs, &KeywordClassifier);
        let acme = &recs["CS/IT"]["acme"];
        assert_eq!(acme.len(), TOP_K);
        for pair in acme.windows(2) {
            assert!(pair[0].fit_score >= pair[1].fit_score);
        }
    }

    #[test]
    fn cost_penalty_is_domain_scoped_and_subtractive() {
        let certs = vec![
            sample_cert("cheap", "Widget Cert", "Issuer", Some(100.0)),
            sample_cert("pricey", "Widget Cert Pro", "Issuer", Some(900.0)),
            sample_cert("free", "Widget Cert Lite", "Issuer", None),
        ];
        let mut companies = BTreeMap::new();
        companies.insert(
            "CS/IT".to_string(),
            vec![sample_company("acme", "Acme", &[])],
        );
        let demand = HashMap::new();
        let affinity = AffinityTable::new();
        let inputs = sample_inputs(&certs, &companies, &demand, &affinity);

        let recs = build(&inputs, &KeywordClassifier);
        let by_slug: HashMap<&str, &Recommendation> = recs["CS/IT"]["acme"]
            .iter()
            .map(|r| (r.slug.as_str(), r))
            .collect();

        assert_eq!(by_slug["cheap"].signals.cost_penalty, 0.0);
        assert_eq!(by_slug["pricey"].signals.cost_penalty, 1.0);
        assert_eq!(by_slug["free"].signals.cost_penalty, 0.0);
        assert!(by_slug["pricey"].fit_score < by_slug["cheap"].fit_score);
    }

    #[test]
    fn company_in_unknown_domain_still_gets_entries() {
        let mut cert = sample_cert("obscure", "Obscure Credential", "Nobody", None);
        cert.domain = "Culinary".to_string();
        let certs = vec![cert];
        let mut companies = BTreeMap::new();
        companies.insert(
            "Culinary".to_string(),
            vec![sample_company("resto", "Resto", &["Line Cook"])],
        );
        let demand = HashMap::new();
        let affinity = AffinityTable::new();
        let inputs = sample_inputs(&certs, &companies, &demand, &affinity);

        let recs = build(&inputs, &KeywordClassifier);
        let resto = &recs["Culinary"]["resto"];
        assert_eq!(resto.len(), 1);
        assert_eq!(resto[0].signals.role_alignment, 0.0);
        assert_eq!(resto[0].signals.best_role_match, None);
    }
}
