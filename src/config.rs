use std::time::Duration;

use crate::listing::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageLimits};
use crate::match_store::DatasetSource;
use crate::stats::DEFAULT_FORM_GAMES;

pub const DEFAULT_DATA_SOURCE: &str = "data/matches.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Knobs that shape a single query's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    pub page_limits: PageLimits,
    pub form_games: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_limits: PageLimits::default(),
            form_games: DEFAULT_FORM_GAMES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: DatasetSource,
    pub http_timeout: Duration,
    pub query: QueryConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Malformed values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let source = lookup("MATCH_DATA_SOURCE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string());
        let max_size = lookup("MATCH_MAX_PAGE_SIZE")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(MAX_PAGE_SIZE)
            .max(1);
        let default_size = lookup("MATCH_DEFAULT_PAGE_SIZE")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, max_size);
        let form_games = lookup("MATCH_FORM_GAMES")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_FORM_GAMES)
            .max(1);
        let timeout_secs = lookup("MATCH_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
            .max(1);

        Self {
            source: DatasetSource::parse(&source),
            http_timeout: Duration::from_secs(timeout_secs),
            query: QueryConfig {
                page_limits: PageLimits {
                    default_size,
                    max_size,
                },
                form_games,
            },
        }
    }
}
