use serde::Serialize;
use tracing::debug;

use crate::entry::DisplayEntry;

/// How a listing entry should be shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "preview", rename_all = "snake_case")]
pub enum Preview {
    /// The resolved URL loaded as its classified type.
    Media { entry: DisplayEntry },
    /// Placeholder for an entry whose content could not be shown.
    Unavailable { entry: DisplayEntry, reason: String },
}

impl Preview {
    pub fn entry(&self) -> &DisplayEntry {
        match self {
            Self::Media { entry } | Self::Unavailable { entry, .. } => entry,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Media { .. })
    }
}

/// Pair every entry with a preview decision.
///
/// `loads` reports whether an entry's resolved URL loads as its type. A
/// failing check only affects that entry; output order and length always
/// match the input.
pub fn render_previews<F>(entries: Vec<DisplayEntry>, mut loads: F) -> Vec<Preview>
where
    F: FnMut(&DisplayEntry) -> Result<(), String>,
{
    entries
        .into_iter()
        .map(|entry| match loads(&entry) {
            Ok(()) => Preview::Media { entry },
            Err(reason) => {
                debug!(locator = %entry.locator, %reason, "preview unavailable");
                Preview::Unavailable { entry, reason }
            }
        })
        .collect()
}
