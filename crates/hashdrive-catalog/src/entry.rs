use hashdrive_types::ContentLocator;
use serde::{Deserialize, Serialize};

use crate::classify::{classify, FileType};
use crate::gateway::Gateway;

/// One row of a listing, ready to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    /// The locator exactly as the ledger holds it.
    pub locator: String,
    pub file_type: FileType,
    pub resolved_url: String,
}

impl DisplayEntry {
    pub fn new(locator: &ContentLocator, gateway: &Gateway) -> Self {
        let raw = locator.as_str();
        Self {
            locator: raw.to_string(),
            file_type: classify(raw),
            resolved_url: gateway.resolve(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_from_pinned_pdf() {
        let locator = ContentLocator::parse("ipfs://abc123/report.pdf").unwrap();
        let entry = DisplayEntry::new(&locator, &Gateway::default());
        assert_eq!(entry.locator, "ipfs://abc123/report.pdf");
        assert_eq!(entry.file_type, FileType::Pdf);
        assert_eq!(
            entry.resolved_url,
            "https://gateway.pinata.cloud/ipfs/abc123/report.pdf"
        );
    }

    #[test]
    fn entry_serializes_with_snake_case_fields() {
        let locator = ContentLocator::parse("https://example.com/a.mp3").unwrap();
        let json = serde_json::to_value(DisplayEntry::new(&locator, &Gateway::default())).unwrap();
        assert_eq!(json["file_type"], "audio");
        assert_eq!(json["resolved_url"], "https://example.com/a.mp3");
    }
}
