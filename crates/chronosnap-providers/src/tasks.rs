//! Google Tasks API client.
//!
//! Tasks come in two stages: list the account's task lists, then fetch
//! each list's tasks. Completed and hidden tasks are always included.

use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderResult;
use crate::http::get_json;
use crate::raw::{RawTask, RawTaskList};

/// Base URL for Google Tasks API v1.
const TASKS_API_BASE: &str = "https://www.googleapis.com/tasks/v1";

/// Client for the task-lists and tasks-per-list endpoints.
#[derive(Debug, Clone)]
pub struct TasksClient {
    http: reqwest::Client,
    access_token: String,
}

impl TasksClient {
    /// Creates a client using the given HTTP client and bearer token.
    pub fn new(http: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    /// Lists all of the account's task lists.
    pub async fn list_task_lists(&self) -> ProviderResult<Vec<RawTaskList>> {
        let url = format!("{}/users/@me/lists", TASKS_API_BASE);
        let request = self.http.get(&url).bearer_auth(&self.access_token);

        let response: TaskListsResponse = get_json("tasks", request).await?;
        debug!(count = response.items.len(), "fetched task lists");
        Ok(response.items)
    }

    /// Lists every task in one list, including completed and hidden ones.
    pub async fn list_tasks(&self, list_id: &str) -> ProviderResult<Vec<RawTask>> {
        let url = format!(
            "{}/lists/{}/tasks",
            TASKS_API_BASE,
            urlencoding::encode(list_id)
        );
        let request = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("showCompleted", "true"), ("showHidden", "true")]);

        let response: TasksResponse = get_json("tasks", request).await?;
        Ok(response.items)
    }
}

/// Response from the task-lists endpoint.
#[derive(Debug, Deserialize)]
struct TaskListsResponse {
    #[serde(default)]
    items: Vec<RawTaskList>,
}

/// Response from the tasks-per-list endpoint.
#[derive(Debug, Deserialize)]
struct TasksResponse {
    #[serde(default)]
    items: Vec<RawTask>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_task_lists_response() {
        let json = r#"{
            "items": [
                { "id": "list-1", "title": "My Tasks" },
                { "id": "list-2", "title": "Errands" }
            ]
        }"#;

        let response: TaskListsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[1].title, "Errands");
    }

    #[test]
    fn parse_tasks_response() {
        let json = r#"{
            "items": [
                {
                    "id": "task-1",
                    "title": "Buy milk",
                    "status": "needsAction",
                    "updated": "2024-02-01T00:00:00.000Z"
                },
                {
                    "id": "task-2",
                    "title": "File taxes",
                    "due": "2024-04-15T00:00:00.000Z",
                    "status": "completed",
                    "completed": "2024-04-10T12:00:00.000Z",
                    "updated": "2024-04-10T12:00:00.000Z"
                }
            ]
        }"#;

        let response: TasksResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 2);
        assert!(response.items[0].due.is_none());
        assert_eq!(
            response.items[1].completed.as_deref(),
            Some("2024-04-10T12:00:00.000Z")
        );
    }

    #[test]
    fn parse_empty_tasks_response() {
        let response: TasksResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }
}
