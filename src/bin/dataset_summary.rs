use anyhow::{Context, Result};

use match_insights::stats::available_teams;
use match_insights::{Config, DatasetSource, logging, match_store};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init();

    let mut cfg = Config::from_env();
    if let Some(source) = parse_data_arg() {
        cfg.source = DatasetSource::parse(&source);
    }

    let records = match_store::load(&cfg.source, cfg.http_timeout)
        .with_context(|| format!("load dataset from {}", cfg.source))?;

    let score_valid = records.iter().filter(|r| r.score().is_some()).count();
    let dated = records
        .iter()
        .filter_map(|r| r.kickoff())
        .collect::<Vec<_>>();
    let teams = available_teams(&records);

    println!("Dataset summary");
    println!("Source: {}", cfg.source);
    println!("Matches: {}", records.len());
    println!(
        "Score-valid: {} (invalid or missing: {})",
        score_valid,
        records.len() - score_valid
    );
    println!(
        "Dated: {} (undated or unparsable: {})",
        dated.len(),
        records.len() - dated.len()
    );
    println!(
        "Range: {} .. {}",
        dated
            .iter()
            .min()
            .map(|d| d.date().to_string())
            .unwrap_or_else(|| "n/a".to_string()),
        dated
            .iter()
            .max()
            .map(|d| d.date().to_string())
            .unwrap_or_else(|| "n/a".to_string())
    );
    println!("Teams: {}", teams.len());
    for team in teams.iter().take(20) {
        println!("   - {team}");
    }
    if teams.len() > 20 {
        println!("   ... {} more", teams.len() - 20);
    }

    Ok(())
}

fn parse_data_arg() -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--data=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == "--data" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}
