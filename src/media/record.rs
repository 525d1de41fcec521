use crate::media::MediaKind;
use serde::{Deserialize, Serialize};

/// A media reference extracted from a page, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTriple {
    /// The page the media was found on
    pub source_url: String,

    /// Absolute http(s) URL of the media
    pub media_url: String,

    pub kind: MediaKind,
}

impl MediaTriple {
    pub fn new(
        source_url: impl Into<String>,
        media_url: impl Into<String>,
        kind: MediaKind,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            media_url: media_url.into(),
            kind,
        }
    }
}

/// A persisted media record
///
/// Records are insert-only; nothing in this crate updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    /// Storage-assigned sequence number
    pub id: i64,

    /// The page the media was found on
    pub original_url: String,

    pub media_url: String,

    #[serde(rename = "type")]
    pub kind: MediaKind,

    /// Write time, RFC 3339 UTC
    pub created_at: String,
}
