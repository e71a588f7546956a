//! The unified schedule item: events, tasks, and appointments.
//!
//! Upstream records are heterogeneous; everything downstream of the
//! normalizer works on [`ScheduleItem`]. Category-specific fields live on
//! the [`ItemKind`] variant so they are absent, not null, when they do not
//! apply. On the wire the variant is flattened next to the common fields
//! with a `type` tag of `event`, `task`, or `appointment`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::ItemTime;

/// Placeholder summary for records without a title.
pub const NO_TITLE: &str = "(No Title)";

/// One attendee on an appointment, passed through from the calendar API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

/// Category-specific fields of a schedule item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Event {
        #[serde(default)]
        location: String,
    },
    Task {
        status: String,
        #[serde(rename = "listTitle")]
        list_title: String,
        /// Completion timestamp, preserved as-is; explicit null when absent.
        completed: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        updated: Option<String>,
    },
    Appointment {
        #[serde(default)]
        location: String,
        #[serde(default)]
        attendees: Vec<Attendee>,
    },
}

impl ItemKind {
    /// The wire label of this category.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Event { .. } => "event",
            Self::Task { .. } => "task",
            Self::Appointment { .. } => "appointment",
        }
    }
}

/// The unifying record for events, tasks, and appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: String,
    pub summary: String,
    pub start: ItemTime,
    pub end: ItemTime,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl ScheduleItem {
    /// The wire label of this item's category.
    pub fn kind_label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn is_event(&self) -> bool {
        matches!(self.kind, ItemKind::Event { .. })
    }

    pub fn is_task(&self) -> bool {
        matches!(self.kind, ItemKind::Task { .. })
    }

    pub fn is_appointment(&self) -> bool {
        matches!(self.kind, ItemKind::Appointment { .. })
    }

    /// Location, for the categories that carry one.
    pub fn location(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Event { location } | ItemKind::Appointment { location, .. } => {
                Some(location.as_str())
            }
            ItemKind::Task { .. } => None,
        }
    }

    /// Owning task list title, for tasks.
    pub fn list_title(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Task { list_title, .. } => Some(list_title.as_str()),
            _ => None,
        }
    }

    /// Task status, for tasks.
    pub fn status(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Task { status, .. } => Some(status.as_str()),
            _ => None,
        }
    }

    /// Attendees, for appointments.
    pub fn attendees(&self) -> &[Attendee] {
        match &self.kind {
            ItemKind::Appointment { attendees, .. } => attendees,
            _ => &[],
        }
    }

    fn sort_key(&self) -> (bool, Option<DateTime<Utc>>) {
        let instant = self.start.instant();
        (instant.is_none(), instant)
    }
}

/// Sorts items ascending by parsed start time.
///
/// Items whose start never resolves sort after all resolvable ones. Ties
/// may reorder; the sort is not required to be stable.
pub fn sort_items_by_start(items: &mut [ScheduleItem]) {
    items.sort_unstable_by_key(ScheduleItem::sort_key);
}
