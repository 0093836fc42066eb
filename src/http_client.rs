use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::config::ReportConfig;

const CLIENT_USER_AGENT: &str = concat!("mlb_hr_sheets/", env!("CARGO_PKG_VERSION"));

/// Source of raw response bodies, keyed by absolute URL.
///
/// Pipelines only ever see this trait, so tests can swap the network for a map.
pub trait Fetcher {
    fn get_text(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn from_config(cfg: &ReportConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(cfg.http_timeout_secs)?,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn get_text(&self, url: &str) -> Result<String> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, body));
        }
        Ok(body)
    }
}

pub fn http_client(timeout_secs: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder();
    // reqwest's blocking client defaults to 30s; a batch run waits as long as upstream takes.
    builder = match timeout_secs {
        Some(secs) => builder.timeout(Duration::from_secs(secs)),
        None => builder.timeout(None),
    };
    builder.build().context("failed to build http client")
}
