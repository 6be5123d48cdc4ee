use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::QueryError;
use crate::http_client::http_client;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    /// `None` unless both `home` and `away` are present and numeric.
    fn from_value(v: &Value) -> Option<Self> {
        let home = as_goals(v.get("home")?)?;
        let away = as_goals(v.get("away")?)?;
        Some(Self { home, away })
    }

    pub fn both_scored(&self) -> bool {
        self.home > 0 && self.away > 0
    }
}

/// Kept verbatim; typed views are derived once at load.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    raw: Value,
    home_team: String,
    away_team: String,
    score: Option<Score>,
    kickoff: Option<NaiveDateTime>,
}

impl MatchRecord {
    pub fn from_value(raw: Value) -> Self {
        let home_team = raw.get("home_team").and_then(text_of).unwrap_or_default();
        let away_team = raw.get("away_team").and_then(text_of).unwrap_or_default();
        let score = raw.get("score").and_then(Score::from_value);
        let kickoff = raw
            .get("date")
            .and_then(|v| v.as_str())
            .and_then(parse_datetime);
        Self {
            raw,
            home_team,
            away_team,
            score,
            kickoff,
        }
    }

    pub fn home_team(&self) -> &str {
        &self.home_team
    }

    pub fn away_team(&self) -> &str {
        &self.away_team
    }

    /// Present only for score-valid records.
    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn kickoff(&self) -> Option<NaiveDateTime> {
        self.kickoff
    }

    /// Sort key: undated and unparsable dates sink below every real date.
    pub fn sort_key(&self) -> NaiveDateTime {
        self.kickoff.unwrap_or(NaiveDateTime::MIN)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// Raw `score.<name>` entry, whether or not the record is score-valid.
    pub fn score_field(&self, name: &str) -> Option<&Value> {
        self.raw.get("score")?.get(name)
    }

    pub fn involves(&self, team: &str) -> bool {
        same_team(&self.home_team, team) || same_team(&self.away_team, team)
    }

    pub fn goals_for(&self, team: &str) -> Option<u32> {
        let score = self.score?;
        if same_team(&self.home_team, team) {
            Some(score.home)
        } else if same_team(&self.away_team, team) {
            Some(score.away)
        } else {
            None
        }
    }

    /// League points (3/1/0) earned by `team` in this match. A missing or
    /// broken score reads as 0-0.
    pub fn points_for(&self, team: &str) -> Option<u32> {
        let score = self.score.unwrap_or_default();
        let (own, other) = if same_team(&self.home_team, team) {
            (score.home, score.away)
        } else if same_team(&self.away_team, team) {
            (score.away, score.home)
        } else {
            return None;
        };
        Some(match own.cmp(&other) {
            std::cmp::Ordering::Greater => 3,
            std::cmp::Ordering::Equal => 1,
            std::cmp::Ordering::Less => 0,
        })
    }
}

impl Serialize for MatchRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Where the dataset lives. Anything that looks like an http(s) URL is
/// fetched, everything else is a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DatasetSource::Url(trimmed.to_string())
        } else {
            DatasetSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => write!(f, "{url}"),
        }
    }
}

pub fn load(source: &DatasetSource, timeout: Duration) -> Result<Vec<MatchRecord>, QueryError> {
    let bytes = match source {
        DatasetSource::File(path) => read_file(path)?,
        DatasetSource::Url(url) => fetch_url(url, timeout)?,
    };
    let records = parse_dataset(&bytes)?;
    info!(source = %source, records = records.len(), "dataset loaded");
    Ok(records)
}

/// Raw bytes to record sequence. A missing `matches` key is an empty dataset;
/// anything that is not a JSON object at the top is corrupt.
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<MatchRecord>, QueryError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| QueryError::DataCorrupt(format!("invalid dataset json: {err}")))?;
    let Value::Object(mut top) = value else {
        return Err(QueryError::DataCorrupt(
            "dataset must be a JSON object".to_string(),
        ));
    };
    let matches = match top.remove("matches") {
        None | Some(Value::Null) => {
            debug!("dataset has no `matches` key; treating as empty");
            return Ok(Vec::new());
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(QueryError::DataCorrupt(
                "`matches` must be an array".to_string(),
            ));
        }
    };
    Ok(matches.into_iter().map(MatchRecord::from_value).collect())
}

fn read_file(path: &Path) -> Result<Vec<u8>, QueryError> {
    fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => {
            QueryError::DataUnavailable(format!("dataset not found at {}", path.display()))
        }
        _ => QueryError::DataUnavailable(format!("read {}: {err}", path.display())),
    })
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>, QueryError> {
    let client =
        http_client(timeout).map_err(|err| QueryError::DataUnavailable(format!("{err:#}")))?;
    let resp = client
        .get(url)
        .send()
        .map_err(|err| QueryError::DataUnavailable(format!("request {url}: {err}")))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(QueryError::DataUnavailable(format!("http {status} from {url}")));
    }
    let body = resp
        .bytes()
        .map_err(|err| QueryError::DataUnavailable(format!("read body from {url}: {err}")))?;
    Ok(body.to_vec())
}

pub fn same_team(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Date-only values resolve to midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

fn text_of(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_goals(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok();
    }
    if let Some(f) = v.as_f64() {
        if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
            return Some(f as u32);
        }
        return None;
    }
    v.as_str()?.trim().parse::<u32>().ok()
}
