use serde::Serialize;

use crate::error::QueryError;
use crate::listing::Page;
use crate::match_store::MatchRecord;
use crate::prediction::{MatchPrediction, TeamAnalysis};

/// Everything one query returns. Optional sections serialise as explicit
/// `null`, never as missing keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub total_matches: usize,
    pub page: usize,
    pub page_size: usize,
    pub matches: Vec<MatchRecord>,
    pub team_analysis: Option<TeamAnalysis>,
    pub prediction: Option<MatchPrediction>,
    pub teams: Vec<String>,
}

impl ResultEnvelope {
    pub fn to_pretty_json(&self) -> Result<String, QueryError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| QueryError::Computation(format!("serialize response: {err}")))
    }
}

pub fn assemble(
    total_matches: usize,
    page: Page,
    matches: &[&MatchRecord],
    team_analysis: Option<TeamAnalysis>,
    prediction: Option<MatchPrediction>,
    teams: Vec<String>,
) -> ResultEnvelope {
    ResultEnvelope {
        total_matches,
        page: page.page,
        page_size: page.page_size,
        matches: matches.iter().map(|r| (*r).clone()).collect(),
        team_analysis,
        prediction,
        teams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_sections_are_explicit_nulls() {
        let envelope = assemble(
            0,
            Page {
                page: 1,
                page_size: 100,
            },
            &[],
            None,
            None,
            Vec::new(),
        );
        let value = serde_json::to_value(&envelope).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "total_matches",
            "page",
            "page_size",
            "matches",
            "team_analysis",
            "prediction",
            "teams",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert!(value["team_analysis"].is_null());
        assert!(value["prediction"].is_null());
    }
}
