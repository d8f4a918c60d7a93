use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PinError, PinResult};

pub const DEFAULT_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";

/// Credentials and endpoint for the pinning service.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PinataConfig {
    pub api_key: String,
    pub api_secret: String,
    pub endpoint_url: String,
    /// Upper bound for a whole upload request, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            endpoint_url: DEFAULT_ENDPOINT.into(),
            timeout_ms: 60_000,
        }
    }
}

impl PinataConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    /// Check that credentials are present and the endpoint is an HTTP(S) URL.
    pub fn validate(&self) -> PinResult<Url> {
        if !self.has_credentials() {
            return Err(PinError::Config("api_key and api_secret must both be set".into()));
        }
        if self.timeout_ms == 0 {
            return Err(PinError::Config("timeout_ms must be greater than zero".into()));
        }
        let url = Url::parse(&self.endpoint_url)
            .map_err(|e| PinError::Config(format!("endpoint_url {:?}: {e}", self.endpoint_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(PinError::Config(format!("endpoint_url scheme {other:?} is not http(s)"))),
        }
    }
}

impl fmt::Debug for PinataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinataConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .field("endpoint_url", &self.endpoint_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
