use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use std::hint::black_box;

use match_insights::match_store::parse_dataset;
use match_insights::params::sanitize;
use match_insights::{MatchRecord, QueryConfig, execute};

const TEAMS: &[&str] = &[
    "Arsenal",
    "Aston Villa",
    "Brentford",
    "Brighton",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Liverpool",
    "Man City",
    "Man United",
    "Newcastle",
    "Spurs",
    "West Ham",
    "Wolves",
];

fn synthetic_dataset(n: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(26);
    let matches: Vec<Value> = (0..n)
        .map(|idx| {
            let home = rng.gen_range(0..TEAMS.len());
            let mut away = rng.gen_range(0..TEAMS.len());
            if away == home {
                away = (away + 1) % TEAMS.len();
            }
            let score = if idx % 40 == 0 {
                json!({ "home": "n/a" })
            } else {
                json!({ "home": rng.gen_range(0..5), "away": rng.gen_range(0..4) })
            };
            json!({
                "home_team": TEAMS[home],
                "away_team": TEAMS[away],
                "date": format!(
                    "{}-{:02}-{:02}",
                    2015 + rng.gen_range(0..10),
                    rng.gen_range(1..=12),
                    rng.gen_range(1..=28)
                ),
                "score": score,
                "competition": if idx % 7 == 0 { "FA Cup" } else { "Premier League" },
            })
        })
        .collect();
    serde_json::to_vec(&json!({ "matches": matches })).expect("serialize synthetic dataset")
}

fn bench_parse_dataset(c: &mut Criterion) {
    let raw = synthetic_dataset(20_000);
    c.bench_function("parse_dataset_20k", |b| {
        b.iter(|| {
            let records = parse_dataset(black_box(&raw)).unwrap();
            black_box(records.len());
        })
    });
}

fn bench_listing(c: &mut Criterion) {
    let records: Vec<MatchRecord> = parse_dataset(&synthetic_dataset(20_000)).unwrap();
    let params = sanitize([("team", "arsenal"), ("page", "2"), ("page_size", "50")]);
    let cfg = QueryConfig::default();
    c.bench_function("listing_team_filter_20k", |b| {
        b.iter(|| {
            let envelope = execute(black_box(&records), &params, &cfg);
            black_box(envelope.total_matches);
        })
    });
}

fn bench_fixture_prediction(c: &mut Criterion) {
    let records: Vec<MatchRecord> = parse_dataset(&synthetic_dataset(20_000)).unwrap();
    let params = sanitize([
        ("home_team", "Liverpool"),
        ("away_team", "Everton"),
        ("date", "2018-01-01"),
    ]);
    let cfg = QueryConfig::default();
    c.bench_function("fixture_prediction_20k", |b| {
        b.iter(|| {
            let envelope = execute(black_box(&records), &params, &cfg);
            black_box(envelope.prediction.map(|p| p.confidence));
        })
    });
}

criterion_group!(
    benches,
    bench_parse_dataset,
    bench_listing,
    bench_fixture_prediction
);
criterion_main!(benches);
