/// Session state and its transitions
///
/// One SessionState exists for the lifetime of the client. It is created
/// at startup, hydrated once from /last-settings, then mutated in place
/// by user actions. All fields are private: the update loop reads them
/// through accessors and mutates them only through the named transitions
/// below, which keeps the request-lifecycle invariants in one file.

use crate::api::types::{LastSettings, SearchRequest, SearchResult, SelectImageResponse};

/// Default minimum-score threshold (midpoint of the [0, 1] range)
pub const DEFAULT_MIN_SCORE: f32 = 0.5;

/// Default cap on results requested per search
pub const DEFAULT_BATCH_SIZE: u32 = 20;

/// Why a submission was refused before any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// No query image selected; surfaced to the user as a notice
    NoQueryImage,
    /// A search is already in flight; resubmission is a silent no-op
    RequestInFlight,
}

/// Client-owned session state, single instance for the process lifetime
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The active query image; None until picked or restored
    selected_query_path: Option<String>,
    /// Search scope hint; empty string means the backend's default scope
    folder_path: String,
    /// Similarity threshold in [0, 1]
    min_score: f32,
    /// Positive cap on results requested
    batch_size: u32,
    /// Most recently rendered results, in backend rank order
    last_results: Vec<SearchResult>,
    /// Concurrency guard: true for exactly the span of one outstanding search
    request_in_flight: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            selected_query_path: None,
            folder_path: String::new(),
            min_score: DEFAULT_MIN_SCORE,
            batch_size: DEFAULT_BATCH_SIZE,
            last_results: Vec::new(),
            request_in_flight: false,
        }
    }

    // ========== Accessors ==========

    pub fn selected_query_path(&self) -> Option<&str> {
        self.selected_query_path.as_deref()
    }

    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.last_results
    }

    pub fn request_in_flight(&self) -> bool {
        self.request_in_flight
    }

    // ========== Transitions ==========

    /// Hydrate from the server's last-used snapshot. Missing fields leave
    /// the current value untouched; the restored query path is not
    /// validated here (a stale path simply fails to load its preview).
    pub fn restore(&mut self, settings: LastSettings) {
        if let Some(folder) = settings.last_folder {
            self.folder_path = folder;
        }
        if let Some(query) = settings.last_query {
            self.selected_query_path = Some(query);
        }
        if let Some(results) = settings.last_results {
            if !results.is_empty() {
                self.last_results = results;
            }
        }
    }

    /// Adopt a picker response as the new query image. Both picker entry
    /// points (drop-zone click and browse) converge here. Returns false
    /// when the user cancelled, in which case nothing changes.
    pub fn apply_selection(&mut self, response: &SelectImageResponse) -> bool {
        let Some(file_path) = &response.file_path else {
            return false;
        };

        self.selected_query_path = Some(file_path.clone());
        if let Some(folder) = &response.folder_path {
            self.folder_path = folder.clone();
        }

        true
    }

    /// Adopt only the folder from a picker response (the browse trigger).
    /// The selected query image is left alone.
    pub fn apply_folder_selection(&mut self, response: &SelectImageResponse) -> bool {
        let Some(folder) = &response.folder_path else {
            return false;
        };

        self.folder_path = folder.clone();
        true
    }

    /// Pure local transition from the slider; no backend call
    pub fn set_min_score(&mut self, value: f32) {
        self.min_score = value.clamp(0.0, 1.0);
    }

    /// Pure local transition from the folder text input
    pub fn set_folder(&mut self, folder: String) {
        self.folder_path = folder;
    }

    /// Batch size must stay a positive integer
    pub fn set_batch_size(&mut self, size: u32) {
        self.batch_size = size.max(1);
    }

    /// Idle → Submitting. Refused while a request is in flight (the
    /// double-submission guard) or while no query image is selected.
    /// On success the rendered results are cleared, the guard is set,
    /// and the request to issue is returned.
    pub fn begin_search(&mut self) -> Result<SearchRequest, SubmitBlocked> {
        if self.request_in_flight {
            return Err(SubmitBlocked::RequestInFlight);
        }
        let Some(query_path) = &self.selected_query_path else {
            return Err(SubmitBlocked::NoQueryImage);
        };

        let request = SearchRequest {
            query_path: query_path.clone(),
            folder: self.folder_path.clone(),
            min_score: self.min_score,
            batch_size: self.batch_size,
        };

        self.request_in_flight = true;
        self.last_results.clear();

        Ok(request)
    }

    /// Submitting → Success: store the new results and clear the guard
    pub fn complete_search(&mut self, results: Vec<SearchResult>) {
        self.last_results = results;
        self.request_in_flight = false;
    }

    /// Submitting → Failure: clear the guard, keep everything else.
    /// Every failure path must reach this; the controller must never be
    /// left stuck with the guard set.
    pub fn abort_search(&mut self) {
        self.request_in_flight = false;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(path: &str) -> SearchResult {
        SearchResult {
            path: path.to_string(),
            filename: path.to_string(),
            description: String::new(),
            score: 0.9,
            width: 100,
            height: 100,
        }
    }

    fn picked(file: &str, folder: &str) -> SelectImageResponse {
        SelectImageResponse {
            file_path: Some(file.to_string()),
            folder_path: Some(folder.to_string()),
        }
    }

    #[test]
    fn test_fresh_session_defaults() {
        let session = SessionState::new();
        assert!(session.selected_query_path().is_none());
        assert_eq!(session.folder_path(), "");
        assert_eq!(session.min_score(), DEFAULT_MIN_SCORE);
        assert_eq!(session.batch_size(), DEFAULT_BATCH_SIZE);
        assert!(session.results().is_empty());
        assert!(!session.request_in_flight());
    }

    #[test]
    fn test_submit_without_query_is_blocked() {
        let mut session = SessionState::new();

        assert_eq!(session.begin_search(), Err(SubmitBlocked::NoQueryImage));
        // No state change on the refusal path
        assert!(!session.request_in_flight());
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_begin_search_carries_current_settings() {
        let mut session = SessionState::new();
        session.apply_selection(&picked("/p/cat.jpg", "/p"));
        session.set_min_score(0.7);
        session.set_batch_size(5);

        let request = session.begin_search().unwrap();
        assert_eq!(request.query_path, "/p/cat.jpg");
        assert_eq!(request.folder, "/p");
        assert_eq!(request.min_score, 0.7);
        assert_eq!(request.batch_size, 5);
        assert!(session.request_in_flight());
    }

    #[test]
    fn test_double_submission_is_blocked_until_completion() {
        let mut session = SessionState::new();
        session.apply_selection(&picked("/p/cat.jpg", "/p"));

        session.begin_search().unwrap();
        assert_eq!(session.begin_search(), Err(SubmitBlocked::RequestInFlight));
        assert!(session.request_in_flight());

        session.complete_search(vec![result("/p/a.jpg")]);
        assert!(!session.request_in_flight());
        assert!(session.begin_search().is_ok());
    }

    #[test]
    fn test_failure_always_clears_the_guard() {
        let mut session = SessionState::new();
        session.apply_selection(&picked("/p/cat.jpg", "/p"));

        session.begin_search().unwrap();
        session.abort_search();
        assert!(!session.request_in_flight());
    }

    #[test]
    fn test_begin_search_clears_rendered_results() {
        let mut session = SessionState::new();
        session.apply_selection(&picked("/p/cat.jpg", "/p"));
        session.complete_search(vec![result("/p/a.jpg"), result("/p/b.jpg")]);

        session.begin_search().unwrap();
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_cancelled_pick_changes_nothing() {
        let mut session = SessionState::new();
        session.set_folder("/keep".to_string());

        let cancelled = SelectImageResponse::default();
        assert!(!session.apply_selection(&cancelled));
        assert!(session.selected_query_path().is_none());
        assert_eq!(session.folder_path(), "/keep");
    }

    #[test]
    fn test_folder_selection_leaves_query_alone() {
        let mut session = SessionState::new();
        session.apply_selection(&picked("/p/cat.jpg", "/p"));

        let response = SelectImageResponse {
            file_path: Some("/q/dog.jpg".to_string()),
            folder_path: Some("/q".to_string()),
        };
        assert!(session.apply_folder_selection(&response));
        assert_eq!(session.selected_query_path(), Some("/p/cat.jpg"));
        assert_eq!(session.folder_path(), "/q");
    }

    #[test]
    fn test_min_score_is_clamped() {
        let mut session = SessionState::new();
        session.set_min_score(1.5);
        assert_eq!(session.min_score(), 1.0);
        session.set_min_score(-0.2);
        assert_eq!(session.min_score(), 0.0);
    }

    #[test]
    fn test_batch_size_stays_positive() {
        let mut session = SessionState::new();
        session.set_batch_size(0);
        assert_eq!(session.batch_size(), 1);
    }

    #[test]
    fn test_restore_full_snapshot() {
        let mut session = SessionState::new();
        session.restore(LastSettings {
            last_folder: Some("/photos".to_string()),
            last_query: Some("/photos/cat.jpg".to_string()),
            last_results: Some(vec![result("/photos/a.jpg")]),
        });

        assert_eq!(session.folder_path(), "/photos");
        assert_eq!(session.selected_query_path(), Some("/photos/cat.jpg"));
        assert_eq!(session.results().len(), 1);
        assert!(!session.request_in_flight());
    }

    #[test]
    fn test_restore_ignores_empty_results() {
        let mut session = SessionState::new();
        session.restore(LastSettings {
            last_folder: None,
            last_query: None,
            last_results: Some(Vec::new()),
        });

        assert!(session.results().is_empty());
        assert!(session.selected_query_path().is_none());
        assert_eq!(session.folder_path(), "");
    }
}
