use async_trait::async_trait;
use hashdrive_types::ContentId;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::PinataConfig;
use crate::error::{PinError, PinResult};
use crate::traits::ContentStore;

/// Successful pin response. Only `IpfsHash` is required.
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pin_size: Option<u64>,
}

/// Upload client for a Pinata-compatible pinning endpoint.
///
/// Each upload is one multipart `POST` with a single `file` field and the
/// `pinata_api_key` / `pinata_secret_api_key` headers.
pub struct PinataClient {
    client: Client,
    endpoint: Url,
    config: PinataConfig,
}

impl PinataClient {
    pub fn new(config: PinataConfig) -> PinResult<Self> {
        let endpoint = config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PinError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_request_error(&self, err: reqwest::Error) -> PinError {
        if err.is_timeout() {
            PinError::Timeout {
                millis: self.config.timeout_ms,
            }
        } else {
            PinError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ContentStore for PinataClient {
    async fn upload(&self, data: Vec<u8>, filename: &str) -> PinResult<ContentId> {
        let size = data.len();
        let form = Form::new().part("file", Part::bytes(data).file_name(filename.to_string()));

        debug!(endpoint = %self.endpoint, filename, size, "pinning file");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("pinata_api_key", &self.config.api_key)
            .header("pinata_secret_api_key", &self.config.api_secret)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            warn!(status = status.as_u16(), filename, "pinning service rejected upload");
            return Err(PinError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.map_request_error(e))?;
        let parsed: PinResponse = serde_json::from_str(&body)
            .map_err(|e| PinError::MalformedResponse(e.to_string()))?;
        let cid = ContentId::new(parsed.ipfs_hash)?;

        info!(%cid, filename, size, pin_size = ?parsed.pin_size, "file pinned");
        Ok(cid)
    }
}
