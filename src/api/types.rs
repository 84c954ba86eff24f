/// Wire models for the search backend
///
/// Field names are normative: they match the JSON the backend produces
/// and the multipart form fields it expects. The client never re-ranks,
/// re-sorts, or re-scores results; the backend's order is trusted as-is.

use serde::{Deserialize, Serialize};

/// A single ranked match returned by the backend.
///
/// `score` is a similarity confidence in [0, 1], higher = more similar.
/// `width` and `height` are the source pixel dimensions and only feed
/// layout classification; the client never decodes the image itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Backend-addressable identifier, fetchable via /image/:encodedPath
    pub path: String,
    /// Display label
    pub filename: String,
    /// Display caption
    pub description: String,
    /// Similarity confidence in [0, 1]
    pub score: f32,
    /// Source width in pixels
    pub width: u32,
    /// Source height in pixels
    pub height: u32,
}

impl SearchResult {
    /// Height over width, used purely for layout classification
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    /// Score formatted as a percentage with one decimal, e.g. "92.5%"
    pub fn score_percent(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Prior session snapshot from GET /last-settings.
/// Every field is optional; an empty object is a valid "fresh session".
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LastSettings {
    pub last_folder: Option<String>,
    pub last_query: Option<String>,
    pub last_results: Option<Vec<SearchResult>>,
}

/// Response of POST /select-image (the backend-proxied native picker).
/// Absence of `file_path` means the user cancelled the dialog.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SelectImageResponse {
    pub file_path: Option<String>,
    pub folder_path: Option<String>,
}

/// Body of a POST /search response
#[derive(Deserialize, Debug, Clone)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Multipart form fields submitted to POST /search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query_path: String,
    pub folder: String,
    pub min_score: f32,
    pub batch_size: u32,
}
