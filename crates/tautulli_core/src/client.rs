use std::fmt;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT},
    Client,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::TautulliError;

pub const API_PATH: &str = "/api/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_USER_AGENT: &str = concat!("tautulli_to_letterboxd/", env!("CARGO_PKG_VERSION"));

pub struct ClientOptions {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct TautulliClient {
    client: Client,
    endpoint: Url,
    api_key: SecretString,
}

impl TautulliClient {
    pub fn new(options: ClientOptions) -> Result<Self, TautulliError> {
        let endpoint = api_endpoint(&options.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let client = Client::builder()
            .timeout(options.timeout)
            .default_headers(headers)
            .build()
            .map_err(TautulliError::Client)?;

        Ok(Self {
            client,
            endpoint,
            api_key: options.api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn call(&self, cmd: &str, params: &[(&str, String)]) -> Result<Value, TautulliError> {
        debug!(cmd, ?params, "calling Tautulli API");

        let mut req = self
            .client
            .get(self.endpoint.clone())
            .query(&[("cmd", cmd), ("apikey", self.api_key.expose_secret().as_str())]);
        for (k, v) in params {
            req = req.query(&[(k, v.as_str())]);
        }

        let response = req
            .send()
            .await
            .map_err(|err| TautulliError::Connection(err.without_url()))?;
        let status = response.status();
        if !status.is_success() {
            debug!(cmd, %status, "Tautulli API answered with a non-success status");
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TautulliError::Connection(err.without_url()))?;
        serde_json::from_slice(&bytes).map_err(|err| {
            TautulliError::InvalidJson(format!("{cmd} (HTTP {status}): {err}"))
        })
    }
}

fn api_endpoint(base_url: &str) -> Result<Url, TautulliError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(TautulliError::InvalidUrl("base_url is empty".to_string()));
    }
    Url::parse(&format!("{trimmed}{API_PATH}"))
        .map_err(|err| TautulliError::InvalidUrl(format!("{base_url}: {err}")))
}
