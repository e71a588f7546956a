//! File metadata from the storage listing.

use serde::{Deserialize, Serialize};

use crate::time::ItemTime;

/// Metadata for one storage file, a direct passthrough of the listing's
/// field projection. Fetched once per sync, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub created_time: ItemTime,
    #[serde(default)]
    pub modified_time: ItemTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
}
