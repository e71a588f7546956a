//! The appointment classifier.
//!
//! Appointments are not a separate upstream source: they are calendar
//! events whose title or description mentions one of a fixed keyword set.
//! The filter is a plain case-insensitive substring check with no word
//! boundaries ("recall" matches "call"), and it does not remove matched
//! events from the event category. The same underlying event therefore
//! surfaces twice, once as an event and once as an appointment; that
//! duplication is part of the system's observable behavior.

use crate::raw::RawEvent;

/// Keywords that mark an event as appointment-like.
pub const APPOINTMENT_KEYWORDS: &[&str] = &[
    "appointment",
    "meeting",
    "consultation",
    "visit",
    "checkup",
    "doctor",
    "dentist",
    "medical",
    "therapy",
    "interview",
    "call",
];

/// Returns true if the event's title or description contains any keyword.
pub fn is_appointment_like(event: &RawEvent) -> bool {
    let title = event.summary.as_deref().unwrap_or_default().to_lowercase();
    let description = event
        .description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    APPOINTMENT_KEYWORDS
        .iter()
        .any(|keyword| title.contains(keyword) || description.contains(keyword))
}

/// Keeps only the appointment-like events.
pub fn filter_appointments(events: Vec<RawEvent>) -> Vec<RawEvent> {
    events.into_iter().filter(is_appointment_like).collect()
}
