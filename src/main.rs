use iced::keyboard::{self, key};
use iced::widget::{
    button, column, container, mouse_area, row, scrollable, slider, stack, text, text_input, Space,
};
use iced::{event, window, Alignment, Color, ContentFit, Element, Event, Length, Subscription, Task, Theme};

// Declare the application modules
mod api;
mod images;
mod layout;
mod state;
mod ui;

use api::client::ApiClient;
use api::types::{LastSettings, SearchResult, SelectImageResponse};
use images::ImageCache;
use state::session::{SessionState, SubmitBlocked};
use ui::fade::{Fade, HIDE_DELAY, SHOW_DELAY};
use ui::viewer::{PreviewModal, SliderViewer};

/// Main application state
struct Simfind {
    /// HTTP client for the search backend
    client: ApiClient,
    /// The single mutable session (query, settings, results, guard)
    session: SessionState,
    /// Fetched image bytes, keyed by backend path
    cache: ImageCache,
    /// Raw text of the batch-size input (digits only)
    batch_size_input: String,
    /// Whether the gallery has been fed at least once; an untouched
    /// session shows an empty pane, not the "no results" placeholder
    gallery_populated: bool,
    /// Loading overlay visibility, staged so the fade can play
    loading: Fade,
    /// Blocking user notice; None when dismissed
    notice: Option<String>,
    /// Single-image modal for the query preview
    preview: PreviewModal,
    /// Multi-image slider over the current result set
    slider: SliderViewer,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// /last-settings came back (or failed) during bootstrap
    SettingsRestored(Result<LastSettings, String>),
    /// User clicked the selection zone to pick a query image
    PickQueryImage,
    /// The backend picker round-trip for a query image finished
    QueryImagePicked(Result<SelectImageResponse, String>),
    /// User clicked the browse button next to the folder input
    BrowseFolder,
    /// The backend picker round-trip for a folder finished
    FolderPicked(Result<SelectImageResponse, String>),
    /// The OS dropped a file onto the window (unsupported flow)
    FileDropped(std::path::PathBuf),
    /// User edited the folder text input
    FolderEdited(String),
    /// User moved the minimum-score slider
    MinScoreChanged(f32),
    /// User edited the batch-size input
    BatchSizeEdited(String),
    /// User submitted the search form
    SubmitSearch,
    /// Staged delay before the loading overlay becomes fully visible
    LoadingFadedIn,
    /// Staged delay before the loading overlay unmounts
    LoadingFadedOut,
    /// The /search round-trip finished
    SearchFinished(Result<Vec<SearchResult>, String>),
    /// Image bytes arrived (or failed) for one backend path
    ImageFetched {
        path: String,
        result: Result<Vec<u8>, String>,
    },
    /// User clicked the gallery tile at this rank index
    GalleryItemClicked(usize),
    SliderNext,
    SliderPrevious,
    CloseSlider,
    /// User clicked the query preview thumbnail
    OpenPreview,
    PreviewFadedIn,
    ClosePreview,
    PreviewFadedOut,
    EscapePressed,
    DismissNotice,
}

impl Simfind {
    /// Create the application and kick off the session restore
    fn new() -> (Self, Task<Message>) {
        let client = ApiClient::from_env();
        println!("🔍 simfind starting, backend at {}", client.base_url());

        let session = SessionState::new();
        let batch_size_input = session.batch_size().to_string();

        let restore = {
            let client = client.clone();
            Task::perform(
                async move { client.last_settings().await.map_err(|e| e.to_string()) },
                Message::SettingsRestored,
            )
        };

        (
            Simfind {
                client,
                session,
                cache: ImageCache::new(),
                batch_size_input,
                gallery_populated: false,
                loading: Fade::default(),
                notice: None,
                preview: PreviewModal::new(),
                slider: SliderViewer::new(),
            },
            restore,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SettingsRestored(Ok(settings)) => {
                self.session.restore(settings);
                self.gallery_populated = !self.session.results().is_empty();

                let mut tasks = Vec::new();
                if let Some(path) = self.session.selected_query_path().map(str::to_string) {
                    tasks.push(self.fetch_image(path));
                }
                if self.gallery_populated {
                    // Prior results render directly, no /search round-trip
                    tasks.push(self.fetch_result_images());
                }
                Task::batch(tasks)
            }
            Message::SettingsRestored(Err(error)) => {
                // Background restore failures stay silent; the session
                // simply starts empty
                eprintln!("⚠️  Could not restore last session: {error}");
                Task::none()
            }

            Message::PickQueryImage => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.select_image().await.map_err(|e| e.to_string()) },
                    Message::QueryImagePicked,
                )
            }
            Message::QueryImagePicked(Ok(response)) => {
                if self.session.apply_selection(&response) {
                    if let Some(path) = self.session.selected_query_path().map(str::to_string) {
                        return self.fetch_image(path);
                    }
                }
                Task::none()
            }
            Message::QueryImagePicked(Err(error)) => {
                self.notice = Some(format!("Error selecting image: {error}"));
                Task::none()
            }

            Message::BrowseFolder => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.select_image().await.map_err(|e| e.to_string()) },
                    Message::FolderPicked,
                )
            }
            Message::FolderPicked(Ok(response)) => {
                self.session.apply_folder_selection(&response);
                Task::none()
            }
            Message::FolderPicked(Err(error)) => {
                self.notice = Some(format!("Error selecting folder: {error}"));
                Task::none()
            }

            Message::FileDropped(_) => {
                // Raw drops cannot be read here; guide the user to the
                // supported picker flow without touching the session
                self.notice = Some(
                    "Dropped files are not supported. Please click the selection zone to choose an image.".to_string(),
                );
                Task::none()
            }

            Message::FolderEdited(value) => {
                self.session.set_folder(value);
                Task::none()
            }
            Message::MinScoreChanged(value) => {
                self.session.set_min_score(value);
                Task::none()
            }
            Message::BatchSizeEdited(value) => {
                let digits: String = value.chars().filter(char::is_ascii_digit).collect();
                if let Ok(size) = digits.parse::<u32>() {
                    self.session.set_batch_size(size);
                }
                self.batch_size_input = digits;
                Task::none()
            }

            Message::SubmitSearch => match self.session.begin_search() {
                Ok(request) => {
                    self.gallery_populated = false;

                    let client = self.client.clone();
                    let search = Task::perform(
                        async move { client.search(request).await.map_err(|e| e.to_string()) },
                        Message::SearchFinished,
                    );
                    Task::batch([self.show_loading(), search])
                }
                Err(SubmitBlocked::NoQueryImage) => {
                    self.notice = Some("Please select a query image!".to_string());
                    Task::none()
                }
                // Resubmission while a search is in flight is a no-op
                Err(SubmitBlocked::RequestInFlight) => Task::none(),
            },

            Message::LoadingFadedIn => {
                self.loading.finish_show();
                Task::none()
            }
            Message::LoadingFadedOut => {
                self.loading.finish_hide();
                Task::none()
            }

            Message::SearchFinished(Ok(results)) => {
                self.session.complete_search(results);
                self.gallery_populated = true;
                Task::batch([self.hide_loading(), self.fetch_result_images()])
            }
            Message::SearchFinished(Err(error)) => {
                self.session.abort_search();
                self.notice = Some(format!("Error fetching search results: {error}"));
                self.hide_loading()
            }

            Message::ImageFetched { path, result } => {
                match result {
                    Ok(bytes) => self.cache.insert(path, bytes),
                    Err(error) => {
                        self.cache.fetch_failed(&path);
                        eprintln!("⚠️  Failed to load image {path}: {error}");
                    }
                }
                Task::none()
            }

            Message::GalleryItemClicked(index) => {
                // Hand the slider the FULL ranked sequence plus the
                // clicked index, so it can walk to adjacent results
                self.slider.load_images(self.session.results().to_vec());
                self.slider.show(index);
                Task::none()
            }
            Message::SliderNext => {
                self.slider.next();
                Task::none()
            }
            Message::SliderPrevious => {
                self.slider.previous();
                Task::none()
            }
            Message::CloseSlider => {
                self.slider.close();
                Task::none()
            }

            Message::OpenPreview => {
                if let Some(path) = self.session.selected_query_path().map(str::to_string) {
                    let fetch = self.fetch_image(path.clone());
                    let timer = if self.preview.open(path) {
                        Task::perform(tokio::time::sleep(SHOW_DELAY), |_| Message::PreviewFadedIn)
                    } else {
                        Task::none()
                    };
                    return Task::batch([fetch, timer]);
                }
                Task::none()
            }
            Message::PreviewFadedIn => {
                self.preview.finish_open();
                Task::none()
            }
            Message::ClosePreview => self.close_preview(),
            Message::PreviewFadedOut => {
                self.preview.finish_close();
                Task::none()
            }

            Message::EscapePressed => {
                // Escape acts on the topmost visible layer only
                if self.notice.is_some() {
                    self.notice = None;
                } else if self.slider.is_open() {
                    self.slider.close();
                } else if self.preview.is_open() {
                    return self.close_preview();
                }
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    /// Fetch image bytes for a backend path unless already cached or
    /// on the wire
    fn fetch_image(&mut self, path: String) -> Task<Message> {
        if !self.cache.begin_fetch(&path) {
            return Task::none();
        }

        let client = self.client.clone();
        Task::perform(
            async move {
                let result = client.fetch_image(&path).await.map_err(|e| e.to_string());
                (path, result)
            },
            |(path, result)| Message::ImageFetched { path, result },
        )
    }

    /// Fetch bytes for every current result (deduplicated by the cache)
    fn fetch_result_images(&mut self) -> Task<Message> {
        let paths: Vec<String> = self
            .session
            .results()
            .iter()
            .map(|result| result.path.clone())
            .collect();

        Task::batch(paths.into_iter().map(|path| self.fetch_image(path)))
    }

    fn show_loading(&mut self) -> Task<Message> {
        if self.loading.begin_show() {
            Task::perform(tokio::time::sleep(SHOW_DELAY), |_| Message::LoadingFadedIn)
        } else {
            Task::none()
        }
    }

    fn hide_loading(&mut self) -> Task<Message> {
        if self.loading.begin_hide() {
            Task::perform(tokio::time::sleep(HIDE_DELAY), |_| Message::LoadingFadedOut)
        } else {
            Task::none()
        }
    }

    fn close_preview(&mut self) -> Task<Message> {
        if self.preview.close() {
            Task::perform(tokio::time::sleep(HIDE_DELAY), |_| Message::PreviewFadedOut)
        } else {
            Task::none()
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let base = row![self.control_panel(), self.results_pane()]
            .width(Length::Fill)
            .height(Length::Fill);

        let mut layers = stack![base];
        if self.loading.is_mounted() {
            layers = layers.push(self.loading_overlay());
        }
        if self.preview.is_mounted() {
            layers = layers.push(self.preview.view(&self.cache));
        }
        if self.slider.is_open() {
            layers = layers.push(self.slider.view(&self.cache));
        }
        if let Some(notice) = &self.notice {
            layers = layers.push(notice_overlay(notice));
        }

        layers.into()
    }

    /// The search form: selection zone, preview, folder, min score,
    /// batch size, submit
    fn control_panel(&self) -> Element<Message> {
        let selection_zone = mouse_area(
            container(text("Click to choose a query image").size(14))
                .width(Length::Fill)
                .padding(28)
                .center_x(Length::Fill)
                .style(container::bordered_box),
        )
        .on_press(Message::PickQueryImage);

        let preview: Element<Message> = match self.session.selected_query_path() {
            Some(path) => match self.cache.get(path) {
                Some(handle) => mouse_area(
                    iced::widget::image(handle.clone())
                        .width(Length::Fill)
                        .height(Length::Fixed(180.0))
                        .content_fit(ContentFit::Contain),
                )
                .on_press(Message::OpenPreview)
                .into(),
                None => container(text("Loading preview…").size(13))
                    .width(Length::Fill)
                    .center_x(Length::Fill)
                    .into(),
            },
            None => Space::with_height(Length::Shrink).into(),
        };

        let folder = row![
            text_input("Folder to search", self.session.folder_path())
                .on_input(Message::FolderEdited),
            button(text("Browse").size(14)).on_press(Message::BrowseFolder),
        ]
        .spacing(8);

        let min_score = column![
            row![
                text("Minimum score").size(14),
                Space::with_width(Length::Fill),
                text(format!("{:.2}", self.session.min_score())).size(14),
            ],
            slider(0.0..=1.0, self.session.min_score(), Message::MinScoreChanged).step(0.01),
        ]
        .spacing(4);

        let batch = row![
            text("Batch size").size(14),
            Space::with_width(Length::Fill),
            text_input("20", &self.batch_size_input)
                .on_input(Message::BatchSizeEdited)
                .width(Length::Fixed(80.0)),
        ]
        .align_y(Alignment::Center);

        let submit = button(
            container(text("Search").size(16))
                .width(Length::Fill)
                .center_x(Length::Fill),
        )
        .padding(10)
        .width(Length::Fill)
        .on_press(Message::SubmitSearch);

        container(
            column![selection_zone, preview, folder, min_score, batch, submit]
                .spacing(16)
                .width(Length::Fixed(320.0)),
        )
        .padding(20)
        .height(Length::Fill)
        .into()
    }

    /// The result container; empty until the gallery is first fed
    fn results_pane(&self) -> Element<Message> {
        if self.gallery_populated {
            scrollable(ui::gallery::view(self.session.results(), &self.cache))
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        } else {
            container(Space::new(Length::Fill, Length::Fill)).into()
        }
    }

    /// Full-window overlay shown while a search is in flight; blocks
    /// interaction with the form underneath for as long as it is mounted
    fn loading_overlay(&self) -> Element<Message> {
        let alpha = 0.65 * self.loading.opacity();
        let text_color = Color {
            a: self.loading.opacity().max(0.01),
            ..Color::WHITE
        };

        let overlay = container(
            column![
                text("Searching…").size(28).color(text_color),
                text("Matching images against your query")
                    .size(14)
                    .color(text_color),
            ]
            .spacing(8)
            .align_x(Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(move |_theme| iced::widget::container::Style {
            background: Some(Color { a: alpha, ..Color::BLACK }.into()),
            ..Default::default()
        });

        iced::widget::opaque(overlay)
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            keyboard::on_key_press(|pressed, _modifiers| match pressed {
                keyboard::Key::Named(key::Named::Escape) => Some(Message::EscapePressed),
                keyboard::Key::Named(key::Named::ArrowRight) => Some(Message::SliderNext),
                keyboard::Key::Named(key::Named::ArrowLeft) => Some(Message::SliderPrevious),
                _ => None,
            }),
            event::listen_with(|event, _status, _window| match event {
                Event::Window(window::Event::FileDropped(path)) => {
                    Some(Message::FileDropped(path))
                }
                _ => None,
            }),
        ])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Blocking notice with a single dismiss action; everything behind it
/// is inert until dismissed
fn notice_overlay(notice: &str) -> Element<Message> {
    let card = container(
        column![
            text(notice).size(16),
            button(text("OK").size(14)).on_press(Message::DismissNotice),
        ]
        .spacing(16)
        .align_x(Alignment::Center),
    )
    .padding(24)
    .max_width(420)
    .style(container::rounded_box);

    iced::widget::opaque(
        container(card)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| iced::widget::container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.6).into()),
                ..Default::default()
            }),
    )
}

fn main() -> iced::Result {
    iced::application("simfind", Simfind::update, Simfind::view)
        .subscription(Simfind::subscription)
        .theme(Simfind::theme)
        .window_size((1280.0, 860.0))
        .centered()
        .run_with(Simfind::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> Simfind {
        Simfind::new().0
    }

    fn results(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| SearchResult {
                path: format!("/p/{i}.jpg"),
                filename: format!("{i}.jpg"),
                description: format!("result {i}"),
                score: 0.9,
                width: 100,
                height: 100,
            })
            .collect()
    }

    #[test]
    fn test_submit_without_query_raises_notice_and_stays_idle() {
        let mut app = app();

        let _ = app.update(Message::SubmitSearch);

        assert_eq!(app.notice.as_deref(), Some("Please select a query image!"));
        assert!(!app.session.request_in_flight());
        assert!(!app.loading.is_mounted());
    }

    #[tokio::test]
    async fn test_resubmission_during_flight_is_a_silent_no_op() {
        let mut app = app();
        let _ = app.update(Message::QueryImagePicked(Ok(SelectImageResponse {
            file_path: Some("/p/cat.jpg".to_string()),
            folder_path: Some("/p".to_string()),
        })));

        let _ = app.update(Message::SubmitSearch);
        assert!(app.session.request_in_flight());

        let _ = app.update(Message::SubmitSearch);
        assert!(app.session.request_in_flight());
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_search_failure_clears_guard_and_surfaces_notice() {
        let mut app = app();
        let _ = app.update(Message::QueryImagePicked(Ok(SelectImageResponse {
            file_path: Some("/p/cat.jpg".to_string()),
            folder_path: None,
        })));
        let _ = app.update(Message::SubmitSearch);

        let _ = app.update(Message::SearchFinished(Err("boom".to_string())));

        assert!(!app.session.request_in_flight());
        assert!(app.notice.as_deref().unwrap().contains("boom"));
        // The loading overlay is on its way out, never stuck visible
        assert!(!app.loading.is_visible());
    }

    #[test]
    fn test_restored_results_render_without_a_search() {
        let mut app = app();

        let _ = app.update(Message::SettingsRestored(Ok(LastSettings {
            last_folder: Some("/photos".to_string()),
            last_query: Some("/photos/cat.jpg".to_string()),
            last_results: Some(results(3)),
        })));

        assert!(app.gallery_populated);
        assert_eq!(app.session.results().len(), 3);
        assert!(!app.session.request_in_flight());
        assert_eq!(app.session.folder_path(), "/photos");
    }

    #[test]
    fn test_restore_failure_is_silent() {
        let mut app = app();

        let _ = app.update(Message::SettingsRestored(Err("offline".to_string())));

        assert!(app.notice.is_none());
        assert!(!app.gallery_populated);
        assert!(app.session.selected_query_path().is_none());
    }

    #[tokio::test]
    async fn test_gallery_click_hands_slider_the_full_sequence() {
        let mut app = app();
        app.session.apply_selection(&SelectImageResponse {
            file_path: Some("/p/cat.jpg".to_string()),
            folder_path: None,
        });
        let _ = app.update(Message::SubmitSearch);
        let _ = app.update(Message::SearchFinished(Ok(results(5))));

        let _ = app.update(Message::GalleryItemClicked(2));

        assert!(app.slider.is_open());
        assert_eq!(app.slider.images().len(), 5);
        assert_eq!(app.slider.index(), 2);
    }

    #[test]
    fn test_file_drop_is_rejected_without_state_change() {
        let mut app = app();

        let _ = app.update(Message::FileDropped(std::path::PathBuf::from("/p/cat.jpg")));

        assert!(app.notice.is_some());
        assert!(app.session.selected_query_path().is_none());
    }

    #[test]
    fn test_batch_size_input_keeps_digits_only() {
        let mut app = app();

        let _ = app.update(Message::BatchSizeEdited("1a2b".to_string()));
        assert_eq!(app.batch_size_input, "12");
        assert_eq!(app.session.batch_size(), 12);

        // Clearing the field keeps the last good value in the session
        let _ = app.update(Message::BatchSizeEdited(String::new()));
        assert_eq!(app.batch_size_input, "");
        assert_eq!(app.session.batch_size(), 12);
    }

    #[tokio::test]
    async fn test_escape_peels_layers_topmost_first() {
        let mut app = app();
        app.session.apply_selection(&SelectImageResponse {
            file_path: Some("/p/cat.jpg".to_string()),
            folder_path: None,
        });
        let _ = app.update(Message::SubmitSearch);
        let _ = app.update(Message::SearchFinished(Ok(results(2))));
        let _ = app.update(Message::GalleryItemClicked(0));
        app.notice = Some("notice".to_string());

        let _ = app.update(Message::EscapePressed);
        assert!(app.notice.is_none());
        assert!(app.slider.is_open());

        let _ = app.update(Message::EscapePressed);
        assert!(!app.slider.is_open());
    }
}
