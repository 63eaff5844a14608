// tabletop.events HTTP client.
// Appends the API key to every request and hands back raw response bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::{BuddyError, Result};

pub const TTE_BASE_URL: &str = "https://tabletop.events";

/// Anything that can issue GET/POST calls against the remote API.
///
/// Bodies are returned as text; callers decode the JSON envelope themselves,
/// so HTTP status codes are not interpreted here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String>;

    async fn post(&self, path: &str, params: &[(&str, String)]) -> Result<String>;
}

/// tabletop.events API client.
#[derive(Debug, Clone)]
pub struct TteClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl TteClient {
    /// Create a new client for `base_url` using `api_key`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BuddyError::Other(format!("invalid base url {base_url:?}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("conbuddy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BuddyError::Transport)?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Build the request URL with query parameters and the API key.
    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| BuddyError::Other(format!("invalid path {path:?}: {e}")))?;

        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("api_key_id", &self.api_key);

        Ok(url)
    }
}

#[async_trait]
impl Transport for TteClient {
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let url = self.url(path, params)?;
        tracing::debug!(url = %scrub_credentials(url.as_str()), "getting");

        let response = self.client.get(url).send().await?;
        Ok(response.text().await?)
    }

    async fn post(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let url = self.url(path, params)?;
        tracing::debug!(url = %scrub_credentials(url.as_str()), "posting");

        let response = self.client.post(url).send().await?;
        Ok(response.text().await?)
    }
}

/// Cut a URL before any credential-bearing query parameter.
pub fn scrub_credentials(url: &str) -> String {
    ["username", "password", "api_key_id"]
        .iter()
        .fold(url.to_string(), |s, key| cut_at_param(&s, key))
}

fn cut_at_param(s: &str, key: &str) -> String {
    if !s.contains(key) {
        return s.to_string();
    }
    for marker in [format!("&{key}"), format!("?{key}"), key.to_string()] {
        if let Some(i) = s.find(&marker) {
            if i > 0 {
                return s[..i].to_string();
            }
        }
    }
    String::new()
}
