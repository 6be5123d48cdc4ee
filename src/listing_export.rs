use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::match_store::MatchRecord;
use crate::prediction::{MatchPrediction, TeamAnalysis};
use crate::response::ResultEnvelope;

pub struct ExportReport {
    pub matches: usize,
    pub teams: usize,
    pub analysis_rows: usize,
}

/// Writes one query result to an xlsx workbook: the returned page of matches,
/// the team roster, and the fixture analysis when one was requested.
pub fn export_listing(path: &Path, envelope: &ResultEnvelope) -> Result<ExportReport> {
    let mut match_rows = vec![vec![
        "Date".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "Home Goals".to_string(),
        "Away Goals".to_string(),
    ]];
    match_rows.extend(envelope.matches.iter().map(match_row));

    let mut team_rows = vec![vec!["Team".to_string()]];
    team_rows.extend(envelope.teams.iter().map(|t| vec![t.clone()]));

    let mut analysis_rows = vec![vec!["Metric".to_string(), "Value".to_string()]];
    if let Some(analysis) = envelope.team_analysis.as_ref() {
        analysis_rows.extend(team_analysis_rows(analysis));
    }
    if let Some(prediction) = envelope.prediction.as_ref() {
        analysis_rows.extend(prediction_rows(prediction));
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matches")?;
        write_rows(sheet, &match_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &team_rows)?;
    }
    if analysis_rows.len() > 1 {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Prediction")?;
        write_rows(sheet, &analysis_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        matches: match_rows.len().saturating_sub(1),
        teams: team_rows.len().saturating_sub(1),
        analysis_rows: analysis_rows.len().saturating_sub(1),
    })
}

fn match_row(record: &MatchRecord) -> Vec<String> {
    let score = record.score();
    vec![
        record
            .field("date")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        record.home_team().to_string(),
        record.away_team().to_string(),
        opt_to_string(score.map(|s| s.home)),
        opt_to_string(score.map(|s| s.away)),
    ]
}

fn team_analysis_rows(analysis: &TeamAnalysis) -> Vec<Vec<String>> {
    let h2h = &analysis.head_to_head;
    vec![
        metric("Fixture", format!("{} v {}", analysis.home_team, analysis.away_team)),
        metric("Matches", analysis.matches_count.to_string()),
        metric(
            "Both Teams Scored %",
            format!("{:.2}", analysis.both_teams_scored_percentage),
        ),
        metric(
            "Avg Total Goals",
            format!("{:.2}", analysis.goals.average_total_goals),
        ),
        metric(
            "Avg Home Goals",
            format!("{:.2}", analysis.goals.average_home_goals),
        ),
        metric(
            "Avg Away Goals",
            format!("{:.2}", analysis.goals.average_away_goals),
        ),
        metric("Home Form %", format!("{:.2}", analysis.home_team_form)),
        metric("Away Form %", format!("{:.2}", analysis.away_team_form)),
        metric(
            "H2H Home/Draw/Away",
            format!("{}/{}/{}", h2h.home_wins, h2h.draws, h2h.away_wins),
        ),
    ]
}

fn prediction_rows(prediction: &MatchPrediction) -> Vec<Vec<String>> {
    let probs = &prediction.model_predictions.probability_model;
    let goals = &prediction.model_predictions.goal_model;
    vec![
        metric(
            "Predicted Winner",
            prediction.model_predictions.classifier.label.clone(),
        ),
        metric("Confidence", format!("{:.2}", prediction.confidence)),
        metric(
            "Expected Goals",
            format!(
                "{:.2} - {:.2}",
                prediction.home_expected_goals, prediction.away_expected_goals
            ),
        ),
        metric("Scoreline", format!("{}-{}", goals.home, goals.away)),
        metric(
            "BTTS Probability %",
            format!("{:.2}", prediction.both_teams_to_score_prob),
        ),
        metric(
            "Win Probabilities H/D/A",
            format!("{:.2}/{:.2}/{:.2}", probs.home, probs.draw, probs.away),
        ),
    ]
}

fn metric(name: &str, value: String) -> Vec<String> {
    vec![name.to_string(), value]
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
