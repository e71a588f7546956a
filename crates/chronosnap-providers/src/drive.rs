//! Google Drive API client.

use chronosnap_core::FileRecord;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderResult;
use crate::http::get_json;

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Fields requested from the listing; the response maps straight onto
/// [`FileRecord`].
const FILE_FIELDS: &str = "files(id,name,mimeType,createdTime,modifiedTime,webViewLink)";

/// Client for the file-listing endpoint.
#[derive(Debug, Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    access_token: String,
}

impl DriveClient {
    /// Creates a client using the given HTTP client and bearer token.
    pub fn new(http: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    /// Lists all non-trashed files, newest-modified first.
    pub async fn list_files(&self) -> ProviderResult<Vec<FileRecord>> {
        let url = format!("{}/files", DRIVE_API_BASE);
        let request = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("q", "trashed = false"),
                ("orderBy", "modifiedTime desc"),
                ("fields", FILE_FIELDS),
            ]);

        let response: FileListResponse = get_json("drive", request).await?;
        debug!(count = response.files.len(), "fetched drive files");
        Ok(response.files)
    }
}

/// Response from the files.list endpoint.
#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<FileRecord>,
}
