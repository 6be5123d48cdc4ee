//! Aggregates over an already-filtered match set. `both_teams_scored_percentage`
//! and `average_goals` divide by the full set; the rest by score-valid records.

use std::collections::HashSet;

use serde::Serialize;

use crate::match_store::MatchRecord;

pub const DEFAULT_FORM_GAMES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GoalAverages {
    pub average_total_goals: f64,
    pub average_home_goals: f64,
    pub average_away_goals: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HeadToHead {
    pub total_matches: usize,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
    pub home_win_percentage: f64,
    pub away_win_percentage: f64,
    pub draw_percentage: f64,
}

pub fn both_teams_scored_percentage(set: &[&MatchRecord]) -> f64 {
    if set.is_empty() {
        return 0.0;
    }
    let hits = set
        .iter()
        .filter(|r| r.score().is_some_and(|s| s.both_scored()))
        .count();
    percentage(hits, set.len())
}

pub fn average_goals(set: &[&MatchRecord]) -> GoalAverages {
    if set.is_empty() {
        return GoalAverages::default();
    }
    let (mut home, mut away) = (0u64, 0u64);
    for record in set {
        let score = record.score().unwrap_or_default();
        home += u64::from(score.home);
        away += u64::from(score.away);
    }
    let n = set.len() as f64;
    GoalAverages {
        average_total_goals: round2((home + away) as f64 / n),
        average_home_goals: round2(home as f64 / n),
        average_away_goals: round2(away as f64 / n),
    }
}

/// `set` is taken in the order given; callers pass it newest first.
pub fn form_index(set: &[&MatchRecord], team: &str, recent_games: usize) -> f64 {
    if team.is_empty() || recent_games == 0 {
        return 0.0;
    }
    let points: Vec<u32> = set
        .iter()
        .filter_map(|r| r.points_for(team))
        .take(recent_games)
        .collect();
    if points.is_empty() {
        return 0.0;
    }
    let earned: u32 = points.iter().sum();
    let available = 3 * points.len();
    round2(f64::from(earned) / available as f64 * 100.0)
}

pub fn head_to_head_stats(set: &[&MatchRecord]) -> HeadToHead {
    let mut out = HeadToHead::default();
    for score in set.iter().filter_map(|r| r.score()) {
        out.total_matches += 1;
        match score.home.cmp(&score.away) {
            std::cmp::Ordering::Greater => out.home_wins += 1,
            std::cmp::Ordering::Less => out.away_wins += 1,
            std::cmp::Ordering::Equal => out.draws += 1,
        }
    }
    if out.total_matches > 0 {
        out.home_win_percentage = percentage(out.home_wins, out.total_matches);
        out.away_win_percentage = percentage(out.away_wins, out.total_matches);
        out.draw_percentage = percentage(out.draws, out.total_matches);
    }
    out
}

pub fn expected_goals(team: &str, set: &[&MatchRecord]) -> f64 {
    let goals: Vec<u32> = set.iter().filter_map(|r| r.goals_for(team)).collect();
    if goals.is_empty() {
        return 0.0;
    }
    let sum: u64 = goals.iter().map(|&g| u64::from(g)).sum();
    round2(sum as f64 / goals.len() as f64)
}

pub fn both_teams_to_score_probability(set: &[&MatchRecord]) -> f64 {
    let (valid, hits) = set
        .iter()
        .filter_map(|r| r.score())
        .fold((0usize, 0usize), |(valid, hits), s| {
            (valid + 1, hits + usize::from(s.both_scored()))
        });
    if valid == 0 {
        return 0.0;
    }
    percentage(hits, valid)
}

/// First-seen casing and order.
pub fn available_teams(all: &[MatchRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in all {
        for name in [record.home_team(), record.away_team()] {
            if name.is_empty() {
                continue;
            }
            if seen.insert(name.to_lowercase()) {
                out.push(name.to_string());
            }
        }
    }
    out
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn percentage(part: usize, whole: usize) -> f64 {
    round2(part as f64 / whole as f64 * 100.0)
}
