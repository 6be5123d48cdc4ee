use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use match_insights::listing_export;
use match_insights::{Config, DatasetSource, handle_configured, logging};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut cfg = Config::from_env();
    if let Some(source) = flag_value(&args, "data") {
        cfg.source = DatasetSource::parse(&source);
    }
    let xlsx = flag_value(&args, "xlsx").map(PathBuf::from);
    let query = query_pairs(&args);

    let envelope = match handle_configured(&cfg, &query) {
        Ok(envelope) => envelope,
        Err(err) => {
            let body = serde_json::to_string_pretty(&err.to_json())
                .context("serialize error body")?;
            println!("{body}");
            std::process::exit(1);
        }
    };

    if let Some(path) = xlsx {
        let report = listing_export::export_listing(&path, &envelope)?;
        eprintln!(
            "Wrote {} ({} matches, {} teams, {} analysis rows)",
            path.display(),
            report.matches,
            report.teams,
            report.analysis_rows
        );
    }

    println!("{}", envelope.to_pretty_json()?);
    Ok(())
}

/// `--name=value` or `--name value`.
fn flag_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}

/// Bare `key=value` arguments become query parameters; later keys win.
fn query_pairs(args: &[String]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(flag) = arg.strip_prefix("--") {
            skip_next = !flag.contains('=');
            continue;
        }
        if let Some((key, value)) = arg.split_once('=') {
            out.insert(key.to_string(), value.to_string());
        }
    }
    out
}
