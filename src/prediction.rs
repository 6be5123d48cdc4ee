use serde::Serialize;

use crate::match_store::{MatchRecord, same_team};
use crate::stats::{self, GoalAverages, HeadToHead, round2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Away,
    Draw,
    Unknown,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Home => "Home Win",
            Outcome::Away => "Away Win",
            Outcome::Draw => "Draw",
            Outcome::Unknown => "Insufficient Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WinnerPrediction {
    pub winner: Outcome,
    pub confidence: f64,
}

impl WinnerPrediction {
    pub fn unknown() -> Self {
        Self {
            winner: Outcome::Unknown,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAnalysis {
    pub home_team: String,
    pub away_team: String,
    pub matches_count: usize,
    pub both_teams_scored_percentage: f64,
    #[serde(flatten)]
    pub goals: GoalAverages,
    pub home_team_form: f64,
    pub away_team_form: f64,
    pub head_to_head: HeadToHead,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPrediction {
    pub home_expected_goals: f64,
    pub away_expected_goals: f64,
    pub both_teams_to_score_prob: f64,
    pub predicted_winner: Outcome,
    pub confidence: f64,
    pub head_to_head_matches: usize,
    pub model_predictions: ModelPredictions,
}

/// The same heuristic numbers shown three ways.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPredictions {
    pub classifier: ClassifierView,
    pub goal_model: GoalModelView,
    pub probability_model: ProbabilityView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierView {
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalModelView {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityView {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

pub fn team_analysis_subset<'a>(
    set: &[&'a MatchRecord],
    home: &str,
    away: &str,
) -> Vec<&'a MatchRecord> {
    set.iter()
        .copied()
        .filter(|r| {
            (same_team(r.home_team(), home) && same_team(r.away_team(), away))
                || (same_team(r.home_team(), away) && same_team(r.away_team(), home))
        })
        .collect()
}

/// Matches with `home` at home and `away` away. Reverse fixtures are left out,
/// unlike `team_analysis_subset`.
pub fn head_to_head_subset<'a>(
    set: &[&'a MatchRecord],
    home: &str,
    away: &str,
) -> Vec<&'a MatchRecord> {
    set.iter()
        .copied()
        .filter(|r| same_team(r.home_team(), home) && same_team(r.away_team(), away))
        .collect()
}

/// Ties fall to `Draw`.
pub fn predict_winner(h2h: &[&MatchRecord], home: &str, away: &str) -> WinnerPrediction {
    if h2h.is_empty() || home.is_empty() || away.is_empty() {
        return WinnerPrediction::unknown();
    }
    let (mut home_wins, mut away_wins, mut draws) = (0usize, 0usize, 0usize);
    for score in h2h.iter().filter_map(|r| r.score()) {
        match score.home.cmp(&score.away) {
            std::cmp::Ordering::Greater => home_wins += 1,
            std::cmp::Ordering::Less => away_wins += 1,
            std::cmp::Ordering::Equal => draws += 1,
        }
    }
    let total = home_wins + away_wins + draws;
    if total == 0 {
        return WinnerPrediction::unknown();
    }
    let (winner, count) = if home_wins > away_wins && home_wins > draws {
        (Outcome::Home, home_wins)
    } else if away_wins > home_wins && away_wins > draws {
        (Outcome::Away, away_wins)
    } else {
        (Outcome::Draw, draws)
    };
    WinnerPrediction {
        winner,
        confidence: round2(count as f64 / total as f64),
    }
}

pub fn win_probability(prediction: &WinnerPrediction, outcome: Outcome) -> f64 {
    if prediction.winner == Outcome::Unknown {
        return round2(1.0 / 3.0);
    }
    if outcome == prediction.winner {
        prediction.confidence
    } else {
        round2((1.0 - prediction.confidence) / 2.0)
    }
}

/// `sorted` is the filtered set, newest first.
pub fn analyze_fixture(
    sorted: &[&MatchRecord],
    home: &str,
    away: &str,
    form_games: usize,
) -> TeamAnalysis {
    let subset = team_analysis_subset(sorted, home, away);
    TeamAnalysis {
        home_team: home.to_string(),
        away_team: away.to_string(),
        matches_count: subset.len(),
        both_teams_scored_percentage: stats::both_teams_scored_percentage(&subset),
        goals: stats::average_goals(&subset),
        home_team_form: stats::form_index(sorted, home, form_games),
        away_team_form: stats::form_index(sorted, away, form_games),
        head_to_head: stats::head_to_head_stats(&subset),
    }
}

pub fn predict(filtered: &[&MatchRecord], home: &str, away: &str) -> MatchPrediction {
    let h2h = head_to_head_subset(filtered, home, away);
    let winner = predict_winner(&h2h, home, away);
    let home_xg = stats::expected_goals(home, filtered);
    let away_xg = stats::expected_goals(away, filtered);

    MatchPrediction {
        home_expected_goals: home_xg,
        away_expected_goals: away_xg,
        both_teams_to_score_prob: stats::both_teams_to_score_probability(filtered),
        predicted_winner: winner.winner,
        confidence: winner.confidence,
        head_to_head_matches: h2h.len(),
        model_predictions: ModelPredictions {
            classifier: ClassifierView {
                label: winner.winner.label().to_string(),
            },
            goal_model: GoalModelView {
                home: home_xg.round() as u32,
                away: away_xg.round() as u32,
            },
            probability_model: ProbabilityView {
                home: win_probability(&winner, Outcome::Home),
                draw: win_probability(&winner, Outcome::Draw),
                away: win_probability(&winner, Outcome::Away),
            },
        },
    }
}
