use serde_json::{Value, json};
use thiserror::Error;

/// Failures that abort a whole request. Everything else (bad parameters,
/// broken scores, empty results) is recovered locally and never surfaces here.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("match data unavailable: {0}")]
    DataUnavailable(String),

    #[error("match data corrupt: {0}")]
    DataCorrupt(String),

    #[error("computation failed: {0}")]
    Computation(String),
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::DataUnavailable(_) => "DATA_UNAVAILABLE",
            QueryError::DataCorrupt(_) => "DATA_CORRUPT",
            QueryError::Computation(_) => "COMPUTATION_ERROR",
        }
    }

    /// Failure body handed to whatever transport hosts the query.
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.code(),
            "message": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_carries_code_and_message() {
        let err = QueryError::DataCorrupt("expected a JSON object".to_string());
        let body = err.to_json();
        assert_eq!(body["error"], "DATA_CORRUPT");
        assert_eq!(
            body["message"],
            "match data corrupt: expected a JSON object"
        );
    }
}
