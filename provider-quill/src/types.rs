//! Quill API wire types
//!
//! Serde representations of the REST responses the connector consumes.
//! Only the fields the sync pipeline reads are modeled.

use serde::Deserialize;

/// Response from `GET /1/folders/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderResponse {
    #[serde(default)]
    pub children: Vec<FolderChild>,
}

/// One entry in a folder listing. Exactly one of the two ids is set.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderChild {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// One entry in the `GET /2/threads/?ids=...` response map.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadEnvelope {
    pub thread: ThreadWire,
}

/// Thread metadata as the API reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadWire {
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Share link; unique and stable for the thread's lifetime
    #[serde(default)]
    pub link: String,

    /// DOCUMENT, THREAD, SPREADSHEET, ...
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub updated_usec: i64,

    #[serde(default)]
    pub author_id: String,
}

/// Response from `GET /1/threads/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadContentResponse {
    pub html: String,
}
