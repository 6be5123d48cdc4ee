use serde_json::Value;

use crate::match_store::{MatchRecord, same_team};
use crate::params::{Criterion, QueryParams};

/// Keeps the records that satisfy every criterion. No criteria means the
/// whole sequence, in its original order.
pub fn filter<'a>(records: &'a [MatchRecord], params: &QueryParams) -> Vec<&'a MatchRecord> {
    records
        .iter()
        .filter(|record| params.criteria().iter().all(|c| matches_criterion(record, c)))
        .collect()
}

pub fn matches_criterion(record: &MatchRecord, criterion: &Criterion) -> bool {
    match criterion {
        Criterion::Team(team) => record.involves(team),
        Criterion::HomeTeam(team) => same_team(record.home_team(), team),
        Criterion::AwayTeam(team) => same_team(record.away_team(), team),
        Criterion::Since(since) => record.kickoff().is_some_and(|kickoff| kickoff >= *since),
        Criterion::ScoreField { field, value } => record
            .score_field(field)
            .and_then(scalar_text)
            .is_some_and(|text| text == *value),
        Criterion::BothTeamsScored(flag) => record
            .score()
            .is_some_and(|score| score.both_scored() == *flag),
        Criterion::Field { name, value } => record
            .field(name)
            .and_then(scalar_text)
            .is_some_and(|text| same_team(&text, value)),
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::sanitize;
    use serde_json::json;

    fn dataset() -> Vec<MatchRecord> {
        [
            json!({"home_team": "Arsenal", "away_team": "Chelsea", "date": "2024-01-10",
                   "score": {"home": 2, "away": 1}, "league": "Premier League"}),
            json!({"home_team": "Chelsea", "away_team": "Spurs", "date": "2024-02-03",
                   "score": {"home": 0, "away": 0}, "league": "Premier League"}),
            json!({"home_team": "Spurs", "away_team": "Arsenal", "date": "2023-12-01",
                   "score": {"home": "x", "away": 3}, "league": "FA Cup"}),
            json!({"home_team": "Arsenal", "away_team": "Spurs"}),
        ]
        .into_iter()
        .map(MatchRecord::from_value)
        .collect()
    }

    #[test]
    fn no_params_passes_everything_through() {
        let records = dataset();
        let kept = filter(&records, &QueryParams::default());
        assert_eq!(kept.len(), records.len());
        assert!(kept.iter().zip(records.iter()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn team_matches_either_side_case_insensitively() {
        let records = dataset();
        let kept = filter(&records, &sanitize([("team", "ARSENAL")]));
        assert_eq!(kept.len(), 3);

        let home_only = filter(&records, &sanitize([("home_team", "arsenal")]));
        assert_eq!(home_only.len(), 2);
    }

    #[test]
    fn date_is_an_inclusive_lower_bound() {
        let records = dataset();
        let kept = filter(&records, &sanitize([("date", "2024-01-10")]));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.kickoff().is_some()));
    }

    #[test]
    fn score_field_compares_as_text() {
        let records = dataset();
        let kept = filter(&records, &sanitize([("score_away", "3")]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].home_team(), "Spurs");

        let missing = filter(&records, &sanitize([("score_extra_time", "1")]));
        assert!(missing.is_empty());
    }

    #[test]
    fn both_teams_scored_needs_a_usable_score() {
        let records = dataset();
        let yes = filter(&records, &sanitize([("both_teams_scored", "1")]));
        assert_eq!(yes.len(), 1);
        let no = filter(&records, &sanitize([("both_teams_scored", "false")]));
        assert_eq!(no.len(), 1);
        assert_eq!(no[0].home_team(), "Chelsea");
    }

    #[test]
    fn unknown_keys_match_top_level_fields() {
        let records = dataset();
        let kept = filter(&records, &sanitize([("league", "fa cup")]));
        assert_eq!(kept.len(), 1);
        let absent = filter(&records, &sanitize([("referee", "Oliver")]));
        assert!(absent.is_empty());
    }

    #[test]
    fn adding_keys_never_grows_the_result() {
        let records = dataset();
        let steps: [&[(&str, &str)]; 4] = [
            &[],
            &[("team", "Arsenal")],
            &[("team", "Arsenal"), ("league", "Premier League")],
            &[
                ("team", "Arsenal"),
                ("league", "Premier League"),
                ("both_teams_scored", "true"),
            ],
        ];
        let mut last = usize::MAX;
        for step in steps {
            let n = filter(&records, &sanitize(step.iter().copied())).len();
            assert!(n <= last);
            last = n;
        }
    }
}
