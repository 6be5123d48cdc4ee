use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;

const USER_AGENT: &str = "match_insights/0.1";

static CLIENTS: Lazy<Mutex<HashMap<Duration, Client>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Blocking client for dataset fetches, one per distinct timeout.
pub fn http_client(timeout: Duration) -> Result<Client> {
    let mut clients = CLIENTS
        .lock()
        .map_err(|_| anyhow!("dataset http client cache poisoned"))?;
    if let Some(client) = clients.get(&timeout) {
        return Ok(client.clone());
    }
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build dataset http client")?;
    clients.insert(timeout, client.clone());
    Ok(client)
}
