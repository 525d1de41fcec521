//! Statistics from the media database
//!
//! Backs the `--stats` command-line mode.

use crate::media::{MediaKind, MediaRecord};
use crate::storage::{MediaQuery, MediaStore, StorageResult};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Number of most recent records listed in the report
const RECENT_LIMIT: u32 = 5;

/// Stored media summary
#[derive(Debug, Clone)]
pub struct MediaStatistics {
    pub total_media: u64,

    /// Count of records by kind, zero counts included
    pub media_by_kind: BTreeMap<String, u64>,

    /// Newest records first
    pub recent: Vec<MediaRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
pub fn load_statistics(storage: &dyn MediaStore) -> StorageResult<MediaStatistics> {
    let total_media = storage.count_total()?;

    let mut media_by_kind = BTreeMap::new();
    for kind in MediaKind::all_kinds() {
        media_by_kind.insert(kind.to_string(), storage.count_by_kind(kind)?);
    }

    let recent = storage
        .query_media(&MediaQuery {
            size: RECENT_LIMIT,
            ..MediaQuery::default()
        })?
        .records;

    Ok(MediaStatistics {
        total_media,
        media_by_kind,
        recent,
    })
}

/// Formats statistics as a plain-text report
pub fn render_statistics(stats: &MediaStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Media Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Total media stored: {}", stats.total_media);
    let _ = writeln!(out);

    let _ = writeln!(out, "Media by Type:");
    for (kind, count) in &stats.media_by_kind {
        let percentage = if stats.total_media > 0 {
            (*count as f64 / stats.total_media as f64) * 100.0
        } else {
            0.0
        };
        let _ = writeln!(out, "  {}: {} ({:.1}%)", kind, count, percentage);
    }

    if !stats.recent.is_empty() {
        let _ = writeln!(out, "\nMost Recent ({}):", stats.recent.len());
        for record in &stats.recent {
            let _ = writeln!(
                out,
                "  #{} [{}] {} (from {})",
                record.id, record.kind, record.media_url, record.original_url
            );
        }
    }

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &MediaStatistics) {
    print!("{}", render_statistics(stats));
}
