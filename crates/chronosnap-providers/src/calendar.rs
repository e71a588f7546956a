//! Google Calendar API client.

use chrono::{DateTime, TimeZone, Utc};
use chronosnap_core::{Attendee, ItemTime};
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderResult;
use crate::http::get_json;
use crate::raw::RawEvent;

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// The fixed fetch window: all events between 2000-01-01 and 2100-01-01.
///
/// The system fetches the account's entire usable history in one sweep;
/// time filtering happens downstream in the presenter.
pub fn sync_window() -> (DateTime<Utc>, DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single().expect("valid window start"),
        Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).single().expect("valid window end"),
    )
}

/// Client for the calendar events endpoint.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    http: reqwest::Client,
    access_token: String,
}

impl CalendarClient {
    /// Creates a client using the given HTTP client and bearer token.
    pub fn new(http: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    /// Lists all events on the primary calendar within the fixed window.
    ///
    /// Recurring events are expanded (`singleEvents=true`) and results are
    /// ordered by start time by the API. Pagination is handled internally.
    pub async fn list_events(&self) -> ProviderResult<Vec<RawEvent>> {
        let mut all_events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_events_page(page_token.as_deref()).await?;

            for event in page.items {
                if let Some(raw) = convert_event(event) {
                    all_events.push(raw);
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = all_events.len(), "fetched calendar events");
        Ok(all_events)
    }

    async fn list_events_page(
        &self,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            CALENDAR_API_BASE,
            urlencoding::encode("primary")
        );

        let (time_min, time_max) = sync_window();

        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        get_json("calendar", request).await
    }
}

/// Converts an API event into a [`RawEvent`]. Events without an id are
/// dropped; missing or malformed times are carried through as-is.
fn convert_event(event: ApiEvent) -> Option<RawEvent> {
    let id = event.id?;

    let start = ItemTime::from_api_fields(
        event.start.date_time.as_deref(),
        event.start.date.as_deref(),
    );
    let end = ItemTime::from_api_fields(event.end.date_time.as_deref(), event.end.date.as_deref());

    let mut raw = RawEvent::new(id, start, end);
    raw.summary = event.summary;
    raw.description = event.description;
    raw.location = event.location;
    raw.attendees = event.attendees.unwrap_or_default();

    Some(raw)
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

/// A single event from the Calendar API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: ApiEventTime,
    end: ApiEventTime,
    attendees: Option<Vec<Attendee>>,
}

/// Event time from the API: a timed field or a date-only field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
}
