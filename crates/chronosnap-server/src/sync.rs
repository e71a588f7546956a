//! The sync orchestrator.
//!
//! One sync fetches the three schedule categories concurrently, merges and
//! sorts them, then fetches the file listing and pairs files to items.
//! Category failures degrade to zero items; a file-listing failure fails
//! the whole sync. That asymmetry is part of the system's contract.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use chronosnap_core::{Match, ScheduleItem, match_files_to_items, sort_items_by_start};
use chronosnap_protocol::{CategoryStatus, SyncSummary};
use chronosnap_providers::{ItemSource, ProviderError, ProviderResult};

/// The outcome of one successful sync, held until the next sync replaces it.
#[derive(Debug, Clone)]
pub struct SyncSession {
    /// One entry per schedule item, in start-time order.
    pub matches: Vec<Match>,
    /// Aggregate counts over the match set.
    pub summary: SyncSummary,
    /// Per-category fetch outcomes, for diagnostics.
    pub categories: Vec<CategoryStatus>,
    /// When the sync completed.
    pub synced_at: DateTime<Utc>,
}

/// A failure that aborts the whole sync.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The file listing failed; without files there is nothing to match.
    #[error("file listing failed: {0}")]
    Files(ProviderError),
}

/// Folds one category's fetch result into items plus a status report.
fn settle_category(
    category: &'static str,
    result: ProviderResult<Vec<ScheduleItem>>,
) -> (Vec<ScheduleItem>, CategoryStatus) {
    match result {
        Ok(items) => {
            let status = CategoryStatus::fetched(category, items.len());
            (items, status)
        }
        Err(e) => {
            warn!(category, error = %e, "category fetch failed, contributing no items");
            (Vec::new(), CategoryStatus::failed(category, e.to_string()))
        }
    }
}

/// Runs one full sync against the given source.
pub async fn run_sync(source: &dyn ItemSource) -> Result<SyncSession, SyncError> {
    let (events, tasks, appointments) = tokio::join!(
        source.fetch_events(),
        source.fetch_tasks(),
        source.fetch_appointments(),
    );

    let mut items = Vec::new();
    let mut categories = Vec::with_capacity(3);
    for (category, result) in [
        ("events", events),
        ("tasks", tasks),
        ("appointments", appointments),
    ] {
        let (fetched, status) = settle_category(category, result);
        items.extend(fetched);
        categories.push(status);
    }

    sort_items_by_start(&mut items);

    let files = source.fetch_files().await.map_err(SyncError::Files)?;

    let matches = match_files_to_items(&items, &files);
    let summary = SyncSummary::from_matches(&matches, files.len());

    info!(
        total = summary.total,
        events = summary.events,
        tasks = summary.tasks,
        appointments = summary.appointments,
        files = summary.file_count,
        items_with_files = summary.items_with_files,
        "sync complete"
    );

    Ok(SyncSession {
        matches,
        summary,
        categories,
        synced_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosnap_core::{FileRecord, ItemKind, ItemTime};
    use chronosnap_providers::BoxFuture;

    /// A canned source; each dataset is either items or an error message.
    struct StubSource {
        events: Result<Vec<ScheduleItem>, String>,
        tasks: Result<Vec<ScheduleItem>, String>,
        appointments: Result<Vec<ScheduleItem>, String>,
        files: Result<Vec<FileRecord>, String>,
    }

    impl StubSource {
        fn ok() -> Self {
            Self {
                events: Ok(Vec::new()),
                tasks: Ok(Vec::new()),
                appointments: Ok(Vec::new()),
                files: Ok(Vec::new()),
            }
        }
    }

    fn canned<T: Clone + Send + 'static>(
        value: &Result<Vec<T>, String>,
    ) -> BoxFuture<'static, ProviderResult<Vec<T>>> {
        let value = value.clone();
        Box::pin(async move { value.map_err(ProviderError::server) })
    }

    impl ItemSource for StubSource {
        fn fetch_events(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>> {
            canned(&self.events)
        }

        fn fetch_tasks(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>> {
            canned(&self.tasks)
        }

        fn fetch_appointments(&self) -> BoxFuture<'_, ProviderResult<Vec<ScheduleItem>>> {
            canned(&self.appointments)
        }

        fn fetch_files(&self) -> BoxFuture<'_, ProviderResult<Vec<FileRecord>>> {
            canned(&self.files)
        }
    }

    fn event(id: &str, summary: &str, start: &str, end: &str) -> ScheduleItem {
        ScheduleItem {
            id: id.to_string(),
            summary: summary.to_string(),
            start: ItemTime::parse(start),
            end: ItemTime::parse(end),
            description: String::new(),
            kind: ItemKind::Event {
                location: String::new(),
            },
        }
    }

    fn task(id: &str, start: &str) -> ScheduleItem {
        ScheduleItem {
            id: id.to_string(),
            summary: "task".to_string(),
            start: ItemTime::parse(start),
            end: ItemTime::parse(start),
            description: String::new(),
            kind: ItemKind::Task {
                status: "needsAction".to_string(),
                list_title: "My Tasks".to_string(),
                completed: None,
                updated: Some(start.to_string()),
            },
        }
    }

    fn file(id: &str, name: &str, created: &str, modified: &str) -> FileRecord {
        FileRecord {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: "application/octet-stream".to_string(),
            created_time: ItemTime::parse(created),
            modified_time: ItemTime::parse(modified),
            web_view_link: None,
        }
    }

    #[tokio::test]
    async fn pairs_file_inside_event_interval() {
        let source = StubSource {
            events: Ok(vec![event(
                "e1",
                "Team Sync",
                "2024-01-10T10:00:00Z",
                "2024-01-10T11:00:00Z",
            )]),
            files: Ok(vec![file(
                "f1",
                "notes.docx",
                "2024-01-09T09:00:00Z",
                "2024-01-10T10:30:00Z",
            )]),
            ..StubSource::ok()
        };

        let session = run_sync(&source).await.unwrap();
        assert_eq!(session.matches.len(), 1);
        assert_eq!(session.matches[0].item.summary, "Team Sync");
        assert_eq!(session.matches[0].files.len(), 1);
        assert_eq!(session.matches[0].files[0].id, "f1");
        assert_eq!(session.summary.items_with_files, 1);
    }

    #[tokio::test]
    async fn merges_and_sorts_all_categories_by_start() {
        let source = StubSource {
            events: Ok(vec![event(
                "e1",
                "late",
                "2024-06-01T10:00:00Z",
                "2024-06-01T11:00:00Z",
            )]),
            tasks: Ok(vec![task("t1", "2024-02-01T00:00:00Z")]),
            appointments: Ok(vec![event(
                "a1",
                "early",
                "2024-01-10T10:00:00Z",
                "2024-01-10T11:00:00Z",
            )]),
            ..StubSource::ok()
        };

        let session = run_sync(&source).await.unwrap();
        let ids: Vec<_> = session.matches.iter().map(|m| m.item.id.as_str()).collect();
        assert_eq!(ids, ["a1", "t1", "e1"]);
        assert_eq!(session.summary.total, 3);
        assert_eq!(
            session.summary.events + session.summary.tasks + session.summary.appointments,
            session.summary.total
        );
    }

    #[tokio::test]
    async fn category_failure_degrades_to_zero_items() {
        let source = StubSource {
            events: Ok(vec![event(
                "e1",
                "kept",
                "2024-01-10T10:00:00Z",
                "2024-01-10T11:00:00Z",
            )]),
            tasks: Err("HTTP 500".to_string()),
            ..StubSource::ok()
        };

        let session = run_sync(&source).await.unwrap();
        assert_eq!(session.summary.total, 1);
        assert_eq!(session.summary.tasks, 0);

        let tasks_status = session
            .categories
            .iter()
            .find(|c| c.category == "tasks")
            .unwrap();
        assert!(!tasks_status.ok);
        assert!(tasks_status.error.as_deref().unwrap().contains("HTTP 500"));

        let events_status = session
            .categories
            .iter()
            .find(|c| c.category == "events")
            .unwrap();
        assert!(events_status.ok);
        assert_eq!(events_status.item_count, 1);
    }

    #[tokio::test]
    async fn all_categories_failing_still_succeeds_with_empty_result() {
        let source = StubSource {
            events: Err("down".to_string()),
            tasks: Err("down".to_string()),
            appointments: Err("down".to_string()),
            files: Ok(vec![file(
                "f1",
                "orphan.pdf",
                "2024-01-01T00:00:00Z",
                "2024-01-01T00:00:00Z",
            )]),
        };

        let session = run_sync(&source).await.unwrap();
        assert!(session.matches.is_empty());
        assert_eq!(session.summary.file_count, 1);
        assert!(session.categories.iter().all(|c| !c.ok));
    }

    #[tokio::test]
    async fn the_same_event_can_surface_as_event_and_appointment() {
        // The appointment category is a second, keyword-filtered fetch of
        // the events feed, so a matching event appears under both types.
        let appointment = ScheduleItem {
            kind: ItemKind::Appointment {
                location: String::new(),
                attendees: Vec::new(),
            },
            ..event(
                "e1",
                "Doctor Visit",
                "2024-03-01T09:00:00Z",
                "2024-03-01T09:30:00Z",
            )
        };
        let source = StubSource {
            events: Ok(vec![event(
                "e1",
                "Doctor Visit",
                "2024-03-01T09:00:00Z",
                "2024-03-01T09:30:00Z",
            )]),
            appointments: Ok(vec![appointment]),
            ..StubSource::ok()
        };

        let session = run_sync(&source).await.unwrap();
        assert_eq!(session.summary.total, 2);
        assert_eq!(session.summary.events, 1);
        assert_eq!(session.summary.appointments, 1);
        let e1_entries = session
            .matches
            .iter()
            .filter(|m| m.item.id == "e1")
            .count();
        assert_eq!(e1_entries, 2);
    }

    #[tokio::test]
    async fn file_listing_failure_fails_the_whole_sync() {
        let source = StubSource {
            events: Ok(vec![event(
                "e1",
                "kept",
                "2024-01-10T10:00:00Z",
                "2024-01-10T11:00:00Z",
            )]),
            files: Err("quota exceeded".to_string()),
            ..StubSource::ok()
        };

        let result = run_sync(&source).await;
        match result {
            Err(SyncError::Files(e)) => assert!(e.to_string().contains("quota exceeded")),
            _ => panic!("expected file-listing failure"),
        }
    }

    #[tokio::test]
    async fn item_without_files_still_yields_a_match() {
        let source = StubSource {
            tasks: Ok(vec![task("t1", "2024-02-01T00:00:00Z")]),
            files: Ok(vec![file(
                "f1",
                "far.pdf",
                "2030-01-01T00:00:00Z",
                "2030-01-01T00:00:00Z",
            )]),
            ..StubSource::ok()
        };

        let session = run_sync(&source).await.unwrap();
        assert_eq!(session.matches.len(), 1);
        assert!(session.matches[0].files.is_empty());
        assert_eq!(session.summary.items_with_files, 0);
    }
}
