//! Provider-facing record types.
//!
//! These carry exactly the fields the pipeline consumes, halfway between
//! the APIs' wire shapes and the core [`ScheduleItem`].
//!
//! [`ScheduleItem`]: chronosnap_core::ScheduleItem

use chronosnap_core::{Attendee, ItemTime};
use serde::Deserialize;

/// One calendar event as fetched, before normalization or classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: ItemTime,
    pub end: ItemTime,
    pub attendees: Vec<Attendee>,
}

impl RawEvent {
    /// Creates a raw event with the required fields.
    pub fn new(id: impl Into<String>, start: ItemTime, end: ItemTime) -> Self {
        Self {
            id: id.into(),
            summary: None,
            description: None,
            location: None,
            start,
            end,
            attendees: Vec::new(),
        }
    }

    /// Builder: set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder: set the attendees.
    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = attendees;
        self
    }
}

/// One task from the tasks-per-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub completed: Option<String>,
}

/// One task list from the task-lists endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTaskList {
    pub id: String,
    #[serde(default)]
    pub title: String,
}
