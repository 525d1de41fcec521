/// Media kind definitions
///
/// A discovered media reference is either an image or a video source.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media found on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaKind {
    /// `<img src>` reference
    Image,

    /// `<video><source src></video>` reference
    Video,
}

impl MediaKind {
    /// Converts the kind to its stored (and wire) representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Video => "VIDEO",
        }
    }

    /// Parses a kind from its stored representation
    ///
    /// Matching is exact: `image` is not `IMAGE`.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "IMAGE" => Some(Self::Image),
            "VIDEO" => Some(Self::Video),
            _ => None,
        }
    }

    /// Returns all media kinds
    pub fn all_kinds() -> Vec<Self> {
        vec![Self::Image, Self::Video]
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
