//! Raw record to [`ScheduleItem`] conversion.
//!
//! Normalization only defaults missing fields; it never validates.
//! Malformed timestamps stay [`ItemTime::Raw`] and flow through untouched.

use chrono::{DateTime, Utc};
use chronosnap_core::{ItemKind, ItemTime, NO_TITLE, ScheduleItem};

use crate::raw::{RawEvent, RawTask};

/// Normalizes a calendar event into a plain event item.
pub fn normalize_event(raw: &RawEvent) -> ScheduleItem {
    ScheduleItem {
        id: raw.id.clone(),
        summary: summary_or_placeholder(raw.summary.as_deref()),
        start: raw.start.clone(),
        end: raw.end.clone(),
        description: raw.description.clone().unwrap_or_default(),
        kind: ItemKind::Event {
            location: raw.location.clone().unwrap_or_default(),
        },
    }
}

/// Normalizes a keyword-classified calendar event into an appointment item.
///
/// Same shape as an event, plus the attendee list (empty when absent).
pub fn normalize_appointment(raw: &RawEvent) -> ScheduleItem {
    ScheduleItem {
        id: raw.id.clone(),
        summary: summary_or_placeholder(raw.summary.as_deref()),
        start: raw.start.clone(),
        end: raw.end.clone(),
        description: raw.description.clone().unwrap_or_default(),
        kind: ItemKind::Appointment {
            location: raw.location.clone().unwrap_or_default(),
            attendees: raw.attendees.clone(),
        },
    }
}

/// Normalizes a task into a task item.
///
/// A task's interval collapses to a single instant: its due date when it
/// has one, else its last-updated time, else `now`. `now` is injected so
/// the fallback stays testable.
pub fn normalize_task(raw: &RawTask, list_title: &str, now: DateTime<Utc>) -> ScheduleItem {
    let start = raw
        .due
        .as_deref()
        .or(raw.updated.as_deref())
        .map(ItemTime::parse)
        .unwrap_or_else(|| ItemTime::from_utc(now));

    ScheduleItem {
        id: raw.id.clone(),
        summary: summary_or_placeholder(raw.title.as_deref()),
        start: start.clone(),
        end: start,
        description: raw.notes.clone().unwrap_or_default(),
        kind: ItemKind::Task {
            status: raw
                .status
                .clone()
                .unwrap_or_else(|| "needsAction".to_string()),
            list_title: list_title.to_string(),
            completed: raw.completed.clone(),
            updated: raw.updated.clone(),
        },
    }
}

fn summary_or_placeholder(summary: Option<&str>) -> String {
    match summary {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NO_TITLE.to_string(),
    }
}
