use std::path::{Path, PathBuf};
use std::time::Duration;

use hashdrive_catalog::GatewayConfig;
use hashdrive_ledger::SyncMode;
use hashdrive_pin::PinataConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DriveError, DriveResult};

pub const ENV_API_KEY: &str = "HASHDRIVE_API_KEY";
pub const ENV_API_SECRET: &str = "HASHDRIVE_API_SECRET";
pub const ENV_ENDPOINT_URL: &str = "HASHDRIVE_ENDPOINT_URL";
pub const ENV_GATEWAY_URL: &str = "HASHDRIVE_GATEWAY_URL";
pub const ENV_LEDGER_PATH: &str = "HASHDRIVE_LEDGER_PATH";

/// Where the local registry log lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub path: PathBuf,
    pub sync_mode: SyncMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".hashdrive/registry.log"),
            sync_mode: SyncMode::default(),
        }
    }
}

/// Top-level configuration, one section per collaborator.
///
/// ```toml
/// ledger_timeout_ms = 30000
///
/// [pinning]
/// api_key = "..."
/// api_secret = "..."
///
/// [gateway]
/// base_url = "https://gateway.pinata.cloud/ipfs"
///
/// [ledger]
/// path = ".hashdrive/registry.log"
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Bound on each ledger call, in milliseconds.
    pub ledger_timeout_ms: u64,
    pub pinning: PinataConfig,
    pub gateway: GatewayConfig,
    pub ledger: LedgerConfig,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            ledger_timeout_ms: 30_000,
            pinning: PinataConfig::default(),
            gateway: GatewayConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl DriveConfig {
    pub fn from_toml_str(s: &str) -> DriveResult<Self> {
        toml::from_str(s).map_err(|e| DriveError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> DriveResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> DriveResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `HASHDRIVE_*` variables from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_API_KEY) {
            self.pinning.api_key = v;
        }
        if let Some(v) = get(ENV_API_SECRET) {
            self.pinning.api_secret = v;
        }
        if let Some(v) = get(ENV_ENDPOINT_URL) {
            self.pinning.endpoint_url = v;
        }
        if let Some(v) = get(ENV_GATEWAY_URL) {
            self.gateway.base_url = v;
        }
        if let Some(v) = get(ENV_LEDGER_PATH) {
            self.ledger.path = PathBuf::from(v);
        }
    }

    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger_timeout_ms)
    }

    /// A copy that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.pinning.api_secret.is_empty() {
            copy.pinning.api_secret = "<redacted>".into();
        }
        copy
    }

    pub fn to_toml_string(&self) -> DriveResult<String> {
        toml::to_string_pretty(self).map_err(|e| DriveError::Config(e.to_string()))
    }
}
