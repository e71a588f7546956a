//! Core types: schedule items, file records, time-window matching

pub mod file;
pub mod item;
pub mod matching;
pub mod time;
pub mod tracing;

pub use file::FileRecord;
pub use item::{Attendee, ItemKind, NO_TITLE, ScheduleItem, sort_items_by_start};
pub use matching::{MATCH_TOLERANCE_HOURS, Match, file_matches_item, match_files_to_items};
pub use time::ItemTime;
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
