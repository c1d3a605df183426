use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

mod config;
mod models;
mod normalize;
mod rank;
mod recommend;
mod report;
mod roles;
mod score;
mod signals;
mod store;

#[derive(Parser)]
#[command(name = "cert-rankings")]
#[command(about = "Certification ranking and recommendation dataset generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-domain and global certification rankings
    Rank {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Override the EMA smoothing factor from ranking.json
        #[arg(long)]
        alpha: Option<f64>,
    },
    /// Build top-3 company recommendations from the current rankings
    Recommend {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Full generation pass: rank, then recommend
    Run {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        #[arg(long)]
        alpha: Option<f64>,
    },
    /// Generate a markdown summary of the latest rankings snapshot
    Report {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank { data_dir, alpha } => rank_command(&data_dir, alpha),
        Commands::Recommend { data_dir } => recommend_command(&data_dir),
        Commands::Run { data_dir, alpha } => {
            rank_command(&data_dir, alpha)?;
            recommend_command(&data_dir)
        }
        Commands::Report { data_dir, out } => report_command(&data_dir, &out),
    }
}

fn rank_command(data_dir: &Path, alpha: Option<f64>) -> anyhow::Result<()> {
    let cfg = config::RankingConfig::load(data_dir)?.with_alpha(alpha);
    let inputs = rank::RankingInputs {
        certifications: store::load_certifications(data_dir)?,
        demand: store::load_demand(data_dir)?,
        salaries: store::load_role_salaries(data_dir)?,
    };
    let previous = store::load_trends(data_dir)?;

    let outcome = rank::run(&inputs, &previous, &cfg, Utc::now().date_naive());
    store::save_rankings(data_dir, &outcome.rankings)?;
    store::save_trends(data_dir, &outcome.trends)?;

    println!(
        "Ranked {} certifications across {} domains.",
        outcome.rankings.len(),
        outcome.domain_count
    );
    println!("Updated {}.", store::rankings_path(data_dir).display());
    println!("Updated {}.", store::trends_path(data_dir).display());
    Ok(())
}

fn recommend_command(data_dir: &Path) -> anyhow::Result<()> {
    let certifications = store::load_certifications(data_dir)?;
    let rankings = store::load_rankings(data_dir)?;
    let demand = store::load_demand(data_dir)?;
    let companies = store::load_companies(data_dir)?;
    let affinity = store::load_affinity(data_dir)?;

    let inputs = recommend::RecommendationInputs {
        certifications: &certifications,
        rankings: &rankings,
        demand: &demand,
        companies: &companies,
        affinity: &affinity,
    };
    let recommendations = recommend::build(&inputs, &roles::KeywordClassifier);
    store::save_recommendations(data_dir, &recommendations)?;

    let company_count: usize = recommendations.values().map(|d| d.len()).sum();
    println!(
        "Built recommendations for {} companies across {} domains.",
        company_count,
        recommendations.len()
    );
    println!("Updated {}.", store::recommendations_path(data_dir).display());
    Ok(())
}

fn report_command(data_dir: &Path, out: &Path) -> anyhow::Result<()> {
    let rankings = store::load_rankings(data_dir)?;
    let trends = store::load_trends(data_dir)?;
    let report = report::build_report(&rankings, &trends);
    std::fs::write(out, report)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("Report written to {}.", out.display());
    Ok(())
}
