use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info};

use crate::config::{Config, QueryConfig};
use crate::error::QueryError;
use crate::listing::{self, Page};
use crate::match_store::{self, MatchRecord};
use crate::params::{self, QueryParams};
use crate::prediction;
use crate::query_filter;
use crate::response::{self, ResultEnvelope};
use crate::stats;

pub fn execute(records: &[MatchRecord], params: &QueryParams, cfg: &QueryConfig) -> ResultEnvelope {
    let mut filtered = query_filter::filter(records, params);
    listing::sort_by_date_desc(&mut filtered);
    let page = Page::resolve(params.page(), params.page_size(), cfg.page_limits);

    let (team_analysis, prediction) = match params.fixture() {
        Some((home, away)) => (
            Some(prediction::analyze_fixture(
                &filtered,
                home,
                away,
                cfg.form_games,
            )),
            Some(prediction::predict(&filtered, home, away)),
        ),
        None => (None, None),
    };

    debug!(
        total = records.len(),
        filtered = filtered.len(),
        page = page.page,
        page_size = page.page_size,
        "query executed"
    );

    response::assemble(
        filtered.len(),
        page,
        page.slice(&filtered),
        team_analysis,
        prediction,
        stats::available_teams(records),
    )
}

/// One request: load the dataset through `load`, sanitise `raw`, compute.
/// A load failure aborts before any filtering; a panic during computation is
/// reported as `QueryError::Computation`.
pub fn handle_request<L, I, K, V>(
    load: L,
    raw: I,
    cfg: &QueryConfig,
) -> Result<ResultEnvelope, QueryError>
where
    L: FnOnce() -> Result<Vec<MatchRecord>, QueryError>,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let records = load()?;
    let params = params::sanitize(raw);
    panic::catch_unwind(AssertUnwindSafe(|| execute(&records, &params, cfg))).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        error!(%message, "query computation failed");
        QueryError::Computation(message)
    })
}

pub fn handle_configured<I, K, V>(cfg: &Config, raw: I) -> Result<ResultEnvelope, QueryError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let result = handle_request(
        || match_store::load(&cfg.source, cfg.http_timeout),
        raw,
        &cfg.query,
    );
    match &result {
        Ok(envelope) => info!(
            source = %cfg.source,
            total_matches = envelope.total_matches,
            returned = envelope.matches.len(),
            "request served"
        ),
        Err(err) => error!(source = %cfg.source, %err, "request failed"),
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure during query computation".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn load_failure_aborts_the_request() {
        let raw: HashMap<String, String> = HashMap::new();
        let result = handle_request(
            || Err(QueryError::DataUnavailable("gone".to_string())),
            raw,
            &QueryConfig::default(),
        );
        assert!(matches!(result, Err(QueryError::DataUnavailable(_))));
    }

    #[test]
    fn panic_payloads_become_messages() {
        let n = 1;
        let caught = panic::catch_unwind(|| {
            if n > 0 {
                panic!("boom {n}");
            }
        })
        .unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "boom 1");
        let caught = panic::catch_unwind(|| {
            if n > 0 {
                panic!("static");
            }
        })
        .unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "static");
    }

    #[test]
    fn huge_scores_still_produce_an_envelope() {
        let envelope = handle_request(
            || {
                crate::match_store::parse_dataset(
                    br#"{"matches": [
                        {"home_team": "A", "away_team": "B", "score": {"home": 3000000000, "away": 0}},
                        {"home_team": "A", "away_team": "B", "score": {"home": 3000000000, "away": 2}}
                    ]}"#,
                )
            },
            [("home_team", "A"), ("away_team", "B")],
            &QueryConfig::default(),
        )
        .unwrap();
        let prediction = envelope.prediction.unwrap();
        assert_eq!(prediction.home_expected_goals, 3_000_000_000.0);
        assert_eq!(prediction.predicted_winner, prediction::Outcome::Home);
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let envelope = handle_request(
            || Ok(Vec::new()),
            [("home_team", "A"), ("away_team", "B")],
            &QueryConfig::default(),
        )
        .unwrap();
        assert_eq!(envelope.total_matches, 0);
        assert!(envelope.matches.is_empty());
        assert!(envelope.teams.is_empty());
        let prediction = envelope.prediction.unwrap();
        assert_eq!(prediction.predicted_winner, prediction::Outcome::Unknown);
    }
}
