use chrono::{NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::match_store::parse_datetime;

const SCORE_PREFIX: &str = "score_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKey {
    Team,
    HomeTeam,
    AwayTeam,
    Date,
    Score(String),
    BothTeamsScored,
    Page,
    PageSize,
    Field(String),
}

impl ParamKey {
    pub fn classify(key: &str) -> Self {
        if let Some(field) = key.strip_prefix(SCORE_PREFIX) {
            return ParamKey::Score(field.to_string());
        }
        match key {
            "team" => ParamKey::Team,
            "home_team" => ParamKey::HomeTeam,
            "away_team" => ParamKey::AwayTeam,
            "date" => ParamKey::Date,
            "both_teams_scored" => ParamKey::BothTeamsScored,
            "page" => ParamKey::Page,
            "page_size" => ParamKey::PageSize,
            other => ParamKey::Field(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Team(String),
    HomeTeam(String),
    AwayTeam(String),
    /// Inclusive lower bound on the match date.
    Since(NaiveDateTime),
    ScoreField { field: String, value: String },
    BothTeamsScored(bool),
    Field { name: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    criteria: Vec<Criterion>,
    page: Option<i64>,
    page_size: Option<i64>,
}

impl QueryParams {
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn page(&self) -> Option<i64> {
        self.page
    }

    pub fn page_size(&self) -> Option<i64> {
        self.page_size
    }

    pub fn home_team(&self) -> Option<&str> {
        self.criteria.iter().find_map(|c| match c {
            Criterion::HomeTeam(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn away_team(&self) -> Option<&str> {
        self.criteria.iter().find_map(|c| match c {
            Criterion::AwayTeam(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn fixture(&self) -> Option<(&str, &str)> {
        Some((self.home_team()?, self.away_team()?))
    }
}

/// Malformed entries are dropped one by one; the request is never rejected.
pub fn sanitize<I, K, V>(raw: I) -> QueryParams
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = QueryParams::default();
    for (key, value) in raw {
        let key = key.as_ref();
        let value = value.as_ref();
        if value.trim().is_empty() {
            debug!(key, "dropping empty parameter");
            continue;
        }
        match ParamKey::classify(key) {
            ParamKey::Page => match parse_int(value) {
                Some(n) => out.page = Some(n),
                None => debug!(key, value, "dropping non-integer page"),
            },
            ParamKey::PageSize => match parse_int(value) {
                Some(n) => out.page_size = Some(n),
                None => debug!(key, value, "dropping non-integer page_size"),
            },
            ParamKey::Date => match parse_datetime(value) {
                Some(dt) => out
                    .criteria
                    .push(Criterion::Since(dt.date().and_time(NaiveTime::MIN))),
                None => debug!(key, value, "dropping unparsable date"),
            },
            ParamKey::BothTeamsScored => match parse_flag(value) {
                Some(flag) => out.criteria.push(Criterion::BothTeamsScored(flag)),
                None => debug!(key, value, "dropping unrecognised both_teams_scored"),
            },
            ParamKey::Score(field) => {
                let trimmed = value.trim();
                if is_numeric(trimmed) {
                    out.criteria.push(Criterion::ScoreField {
                        field,
                        value: trimmed.to_string(),
                    });
                } else {
                    debug!(key, value, "dropping non-numeric score filter");
                }
            }
            ParamKey::Team => push_text(&mut out.criteria, value, Criterion::Team),
            ParamKey::HomeTeam => push_text(&mut out.criteria, value, Criterion::HomeTeam),
            ParamKey::AwayTeam => push_text(&mut out.criteria, value, Criterion::AwayTeam),
            ParamKey::Field(name) => push_text(&mut out.criteria, value, |value| {
                Criterion::Field { name, value }
            }),
        }
    }
    out
}

fn push_text(criteria: &mut Vec<Criterion>, raw: &str, make: impl FnOnce(String) -> Criterion) {
    let cleaned = neutral_escape(raw);
    if !cleaned.is_empty() {
        criteria.push(make(cleaned));
    }
}

// No HTML escaping: team names with `&` must still match the dataset.
fn neutral_escape(raw: &str) -> String {
    raw.trim().chars().filter(|c| !c.is_control()).collect()
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn is_numeric(raw: &str) -> bool {
    raw.parse::<f64>().is_ok_and(|n| n.is_finite())
}
