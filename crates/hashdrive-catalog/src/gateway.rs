use hashdrive_types::SCHEME_PREFIX;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CatalogError, CatalogResult};

pub const DEFAULT_GATEWAY: &str = "https://gateway.pinata.cloud/ipfs";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL that pinned content ids are appended to.
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY.into(),
        }
    }
}

/// Maps `ipfs://` locators onto an HTTP gateway.
#[derive(Clone, Debug)]
pub struct Gateway {
    base: String,
}

impl Gateway {
    pub fn new(config: &GatewayConfig) -> CatalogResult<Self> {
        let url = Url::parse(&config.base_url)
            .map_err(|e| CatalogError::Config(format!("gateway base_url {:?}: {e}", config.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CatalogError::Config(format!(
                "gateway base_url scheme {:?} is not http(s)",
                url.scheme()
            )));
        }
        Ok(Self {
            base: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `ipfs://<cid>[/<path>]` becomes `<base>/<cid>[/<path>]`. Anything
    /// else is returned unchanged, so resolving a resolved URL is a no-op.
    pub fn resolve(&self, locator: &str) -> String {
        match locator.strip_prefix(SCHEME_PREFIX) {
            Some(rest) => format!("{}/{}", self.base, rest),
            None => locator.to_string(),
        }
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self {
            base: DEFAULT_GATEWAY.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gateway(base: &str) -> Gateway {
        Gateway::new(&GatewayConfig {
            base_url: base.into(),
        })
        .unwrap()
    }

    #[test]
    fn resolves_pinned_locator_with_path() {
        let gw = gateway("https://gw.example/ipfs");
        assert_eq!(
            gw.resolve("ipfs://abc123/report.pdf"),
            "https://gw.example/ipfs/abc123/report.pdf"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let gw = gateway("https://gw.example/ipfs/");
        assert_eq!(gw.resolve("ipfs://abc123"), "https://gw.example/ipfs/abc123");
    }

    #[test]
    fn web_urls_pass_through() {
        let gw = Gateway::default();
        let url = "https://example.com/a.png";
        assert_eq!(gw.resolve(url), url);
    }

    #[test]
    fn default_base_is_pinata_gateway() {
        assert_eq!(Gateway::default().base(), DEFAULT_GATEWAY);
        assert_eq!(
            Gateway::new(&GatewayConfig::default()).unwrap().base(),
            DEFAULT_GATEWAY
        );
    }

    #[test]
    fn rejects_invalid_base() {
        let bad = GatewayConfig {
            base_url: "not a url".into(),
        };
        assert!(matches!(Gateway::new(&bad), Err(CatalogError::Config(_))));

        let ftp = GatewayConfig {
            base_url: "ftp://gw.example".into(),
        };
        assert!(matches!(Gateway::new(&ftp), Err(CatalogError::Config(_))));
    }

    proptest! {
        #[test]
        fn resolution_is_idempotent(cid in "[a-zA-Z0-9]{1,46}", name in "[a-z]{0,8}") {
            let gw = Gateway::default();
            let locator = if name.is_empty() {
                format!("ipfs://{cid}")
            } else {
                format!("ipfs://{cid}/{name}.png")
            };
            let once = gw.resolve(&locator);
            prop_assert!(once.starts_with("https://"));
            prop_assert_eq!(gw.resolve(&once), once.clone());
        }

        #[test]
        fn http_urls_are_fixed_points(path in "[a-z0-9/._-]{0,30}") {
            let gw = Gateway::default();
            let url = format!("http://host.example/{path}");
            prop_assert_eq!(gw.resolve(&url), url.clone());
        }
    }
}
