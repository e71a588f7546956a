//! Pairs schedule items with files by timestamp proximity.
//!
//! A file belongs to an item when its modified or created time falls inside
//! the item's [start, end] interval, or within a fixed tolerance of the
//! item's start. The tolerance compensates for tasks and all-day events
//! whose end times carry little information, so a file well outside the
//! interval can still attach if it was touched near the start.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::file::FileRecord;
use crate::item::ScheduleItem;

/// Tolerance around an item's start time, in hours.
pub const MATCH_TOLERANCE_HOURS: i64 = 24;

/// One schedule item paired with the files attached to it.
///
/// Every item from a sync appears in exactly one `Match`; an item with no
/// qualifying files carries an empty list rather than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub item: ScheduleItem,
    pub files: Vec<FileRecord>,
}

fn within_window(
    t: Option<DateTime<Utc>>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    let Some(t) = t else { return false };

    let inside = matches!((start, end), (Some(s), Some(e)) if t >= s && t <= e);
    let near_start =
        matches!(start, Some(s) if (t - s).abs() <= Duration::hours(MATCH_TOLERANCE_HOURS));

    inside || near_start
}

/// Returns true if either of the file's timestamps satisfies the item's
/// time window. Timestamps that never resolve satisfy nothing.
pub fn file_matches_item(file: &FileRecord, item: &ScheduleItem) -> bool {
    let start = item.start.instant();
    let end = item.end.instant();

    within_window(file.modified_time.instant(), start, end)
        || within_window(file.created_time.instant(), start, end)
}

/// Produces one [`Match`] per item, in item order.
///
/// Candidates are computed independently per item, so a file may attach to
/// any number of items. File order within a match follows the input file
/// order (most-recently-modified first, as listed).
pub fn match_files_to_items(items: &[ScheduleItem], files: &[FileRecord]) -> Vec<Match> {
    items
        .iter()
        .map(|item| Match {
            item: item.clone(),
            files: files
                .iter()
                .filter(|file| file_matches_item(file, item))
                .cloned()
                .collect(),
        })
        .collect()
}
