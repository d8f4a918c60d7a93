use std::fmt;

use serde::{Deserialize, Serialize};

/// Display category inferred from a locator's extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Audio,
    Pdf,
    Text,
    Other,
}

/// Extension tables, checked in order. The first table containing the
/// extension wins, which is why `ogg` lands on video and never on audio.
const EXTENSION_TABLE: &[(FileType, &[&str])] = &[
    (FileType::Image, &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"]),
    (FileType::Video, &["mp4", "webm", "ogg", "mov"]),
    (FileType::Audio, &["mp3", "wav", "ogg", "m4a"]),
    (FileType::Pdf, &["pdf"]),
    (FileType::Text, &["txt", "md", "json", "csv", "html", "js", "css", "ts"]),
];

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Pdf => "pdf",
            Self::Text => "text",
            Self::Other => "other",
        }
    }

    /// Extensions that map to this type. Empty for [`FileType::Other`].
    pub fn extensions(&self) -> &'static [&'static str] {
        EXTENSION_TABLE
            .iter()
            .find(|(ty, _)| ty == self)
            .map(|(_, exts)| *exts)
            .unwrap_or(&[])
    }

    /// Whether a served `Content-Type` can be rendered as this type.
    ///
    /// Parameters such as `; charset=utf-8` are ignored. [`FileType::Other`]
    /// accepts anything.
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match self {
            Self::Image => mime.starts_with("image/"),
            Self::Video => mime.starts_with("video/"),
            Self::Audio => mime.starts_with("audio/"),
            Self::Pdf => mime == "application/pdf",
            Self::Text => {
                mime.starts_with("text/")
                    || matches!(
                        mime.as_str(),
                        "application/json" | "application/javascript" | "application/typescript"
                    )
            }
            Self::Other => true,
        }
    }

    /// Whether a consumer can render this type inline.
    pub fn is_media(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a locator by the text after its last `.`, case-insensitively.
///
/// Only the locator string is inspected. A locator without a `.`, or whose
/// extension appears in no table, is [`FileType::Other`].
pub fn classify(locator: &str) -> FileType {
    let Some((_, ext)) = locator.rsplit_once('.') else {
        return FileType::Other;
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(ty, _)| *ty)
        .unwrap_or(FileType::Other)
}
