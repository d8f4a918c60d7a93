use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Storage scheme written in front of every content identifier.
pub const STORAGE_SCHEME: &str = "ipfs";

/// `ipfs://`
pub const SCHEME_PREFIX: &str = "ipfs://";

/// Opaque identifier produced by a content-addressable store.
///
/// Never interpreted beyond basic shape checks: it must be non-empty and must
/// not contain `/` or whitespace, so it can be embedded in a locator path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.is_empty() || value.contains('/') || value.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidContentId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a locator points at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocatorKind {
    /// `ipfs://<cid>[/<path>]`, resolved through a gateway.
    Pinned {
        cid: ContentId,
        path: Option<String>,
    },
    /// An HTTP(S) URL that is already fetchable as-is.
    Web,
}

/// Reference to externally stored content, as recorded on the ledger.
///
/// The original string is preserved byte for byte; parsing only classifies it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentLocator {
    raw: String,
    kind: LocatorKind,
}

impl ContentLocator {
    /// Build the locator for freshly pinned content: `ipfs://<cid>`.
    pub fn pinned(cid: &ContentId) -> Self {
        Self {
            raw: format!("{SCHEME_PREFIX}{cid}"),
            kind: LocatorKind::Pinned {
                cid: cid.clone(),
                path: None,
            },
        }
    }

    /// Parse a locator string read back from a ledger.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if let Some(rest) = s.strip_prefix(SCHEME_PREFIX) {
            let (cid, path) = match rest.split_once('/') {
                Some((cid, path)) if !path.is_empty() => (cid, Some(path.to_string())),
                Some((cid, _)) => (cid, None),
                None => (rest, None),
            };
            let cid = ContentId::new(cid).map_err(|_| TypeError::UnrecognizedLocator(s.into()))?;
            return Ok(Self {
                raw: s.to_string(),
                kind: LocatorKind::Pinned { cid, path },
            });
        }

        let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
        if (lower.starts_with("http://") && s.len() > 7) || (lower.starts_with("https://") && s.len() > 8) {
            return Ok(Self {
                raw: s.to_string(),
                kind: LocatorKind::Web,
            });
        }

        Err(TypeError::UnrecognizedLocator(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &LocatorKind {
        &self.kind
    }

    pub fn content_id(&self) -> Option<&ContentId> {
        match &self.kind {
            LocatorKind::Pinned { cid, .. } => Some(cid),
            LocatorKind::Web => None,
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self.kind, LocatorKind::Pinned { .. })
    }
}

impl FromStr for ContentLocator {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentLocator {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentLocator> for String {
    fn from(locator: ContentLocator) -> Self {
        locator.raw
    }
}

impl fmt::Debug for ContentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentLocator({})", self.raw)
    }
}

impl fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
