//! Historical football match queries: filtered listings, per-fixture
//! statistics and a head-to-head outcome heuristic.

pub mod config;
pub mod error;
pub mod http_client;
pub mod listing;
pub mod listing_export;
pub mod logging;
pub mod match_store;
pub mod params;
pub mod pipeline;
pub mod prediction;
pub mod query_filter;
pub mod response;
pub mod stats;

pub use config::{Config, QueryConfig};
pub use error::QueryError;
pub use match_store::{DatasetSource, MatchRecord, Score};
pub use pipeline::{execute, handle_configured, handle_request};
pub use response::ResultEnvelope;
