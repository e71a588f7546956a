//! The fetch seam between the API clients and the sync orchestrator.
//!
//! [`ItemSource`] is the object-safe trait the orchestrator runs against;
//! [`GoogleSource`] is the real implementation composing the calendar,
//! tasks, and drive clients under one bearer token. Tests drive the
//! orchestrator with stub sources instead of the network.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::Utc;
use chronosnap_core::{FileRecord, ScheduleItem};
use tracing::warn;

use crate::calendar::CalendarClient;
use crate::classify::filter_appointments;
use crate::drive::DriveClient;
use crate::error::ProviderResult;
use crate::normalize::{normalize_appointment, normalize_event, normalize_task};
use crate::tasks::TasksClient;

/// A boxed future for async trait methods, keeping the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Supplies the four datasets one sync consumes.
///
/// The three schedule fetches are independent; the orchestrator may run
/// them concurrently. Each returns fully normalized items.
pub trait ItemSource: Send + Sync {
    /// All calendar events, normalized as plain events.
    fn fetch_events(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>>;

    /// All tasks across every task list, normalized.
    fn fetch_tasks(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>>;

    /// The keyword-classified subset of calendar events, normalized as
    /// appointments. Fetched independently of [`fetch_events`], so both
    /// categories may contain the same underlying event.
    ///
    /// [`fetch_events`]: ItemSource::fetch_events
    fn fetch_appointments(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>>;

    /// All non-trashed files, newest-modified first.
    fn fetch_files(&self) -> BoxFuture<'_, ProviderResult<Vec<FileRecord>>>;
}

/// The real source: Google Calendar, Tasks, and Drive under one token.
#[derive(Debug)]
pub struct GoogleSource {
    calendar: CalendarClient,
    tasks: TasksClient,
    drive: DriveClient,
}

impl GoogleSource {
    /// Builds the three API clients around a shared HTTP client.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        let token = access_token.into();

        Self {
            calendar: CalendarClient::new(http.clone(), token.clone()),
            tasks: TasksClient::new(http.clone(), token.clone()),
            drive: DriveClient::new(http, token),
        }
    }
}

impl ItemSource for GoogleSource {
    fn fetch_events(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>> {
        Box::pin(async move {
            let raw = self.calendar.list_events().await?;
            Ok(raw.iter().map(normalize_event).collect())
        })
    }

    fn fetch_tasks(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>> {
        Box::pin(async move {
            let lists = self.tasks.list_task_lists().await?;
            let now = Utc::now();

            let mut all_tasks = Vec::new();
            for list in &lists {
                // A failing list drops only its own tasks; the fetch as a
                // whole still succeeds with a partial result.
                match self.tasks.list_tasks(&list.id).await {
                    Ok(tasks) => {
                        all_tasks.extend(
                            tasks
                                .iter()
                                .map(|task| normalize_task(task, &list.title, now)),
                        );
                    }
                    Err(e) => {
                        warn!(list = %list.title, error = %e, "failed to fetch tasks from list");
                    }
                }
            }

            Ok(all_tasks)
        })
    }

    fn fetch_appointments(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>> {
        Box::pin(async move {
            let raw = self.calendar.list_events().await?;
            Ok(filter_appointments(raw)
                .iter()
                .map(normalize_appointment)
                .collect())
        })
    }

    fn fetch_files(&self) -> BoxFuture<'_, ProviderResult<Vec<FileRecord>>> {
        Box::pin(async move { self.drive.list_files().await })
    }
}
