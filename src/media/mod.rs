//! Media data model
//!
//! - `MediaKind`: image or video
//! - `MediaTriple`: an extracted (page, media URL, kind) reference
//! - `MediaRecord`: a stored reference with id and write time

mod kind;
mod record;

pub use kind::MediaKind;
pub use record::{MediaRecord, MediaTriple};
