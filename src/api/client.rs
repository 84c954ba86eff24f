use reqwest::multipart::Form;
use thiserror::Error;

use super::types::{LastSettings, SearchRequest, SearchResponse, SearchResult, SelectImageResponse};

/// Backend address used when SIMFIND_BACKEND is not set
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Errors from the backend seam. Non-2xx statuses are folded into
/// `Request` via `error_for_status`, so callers see one failure shape
/// for network, status, and body-parse problems alike.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// HTTP client for the image-similarity backend.
///
/// Cheap to clone (reqwest pools connections internally), which is how
/// it travels into background tasks.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the SIMFIND_BACKEND environment variable,
    /// falling back to the localhost default.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SIMFIND_BACKEND").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /last-settings — prior session snapshot
    pub async fn last_settings(&self) -> Result<LastSettings, ApiError> {
        let settings = self
            .http
            .get(format!("{}/last-settings", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(settings)
    }

    /// POST /select-image — asks the backend to open its native picker.
    /// The call suspends until the user picks or cancels.
    pub async fn select_image(&self) -> Result<SelectImageResponse, ApiError> {
        let response = self
            .http
            .post(format!("{}/select-image", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }

    /// POST /search — submits the query as a multipart form and returns
    /// the ranked results in backend order.
    pub async fn search(&self, request: SearchRequest) -> Result<Vec<SearchResult>, ApiError> {
        let form = Form::new()
            .text("query_path", request.query_path)
            .text("folder", request.folder)
            .text("min_score", request.min_score.to_string())
            .text("batch_size", request.batch_size.to_string());

        let response: SearchResponse = self
            .http
            .post(format!("{}/search", self.base_url))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.results)
    }

    /// URL for an image's raw bytes. The whole path is a single encoded
    /// segment, so '/' inside it must be percent-encoded too.
    pub fn image_url(&self, path: &str) -> String {
        format!("{}/image/{}", self.base_url, urlencoding::encode(path))
    }

    /// GET /image/:encodedPath — raw image bytes
    pub async fn fetch_image(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let bytes = self
            .http
            .get(self.image_url(path))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}
