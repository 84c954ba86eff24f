use iced::widget::{button, column, container, mouse_area, opaque, row, stack, text, Space};
use iced::{Color, ContentFit, Element, Length};

use super::fade::Fade;
use crate::api::types::SearchResult;
use crate::images::ImageCache;
use crate::Message;

/// Lightweight single-image modal for ad hoc previews (the query
/// image). Visibility is fade-gated; it closes on backdrop click,
/// close button, or Escape — only while visible.
#[derive(Debug, Default)]
pub struct PreviewModal {
    fade: Fade,
    path: Option<String>,
}

impl PreviewModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open on a backend image path. Returns true when a fade finalize
    /// timer must be scheduled.
    pub fn open(&mut self, path: String) -> bool {
        self.path = Some(path);
        self.fade.begin_show()
    }

    pub fn finish_open(&mut self) {
        self.fade.finish_show();
    }

    /// Begin closing. Returns true when a finalize timer must be
    /// scheduled; false when there is nothing to close.
    pub fn close(&mut self) -> bool {
        self.fade.begin_hide()
    }

    pub fn finish_close(&mut self) {
        self.fade.finish_hide();
        if !self.fade.is_mounted() {
            self.path = None;
        }
    }

    pub fn is_open(&self) -> bool {
        self.fade.is_visible()
    }

    pub fn is_mounted(&self) -> bool {
        self.fade.is_mounted()
    }

    pub fn view<'a>(&'a self, cache: &'a ImageCache) -> Element<'a, Message> {
        let picture: Element<'a, Message> = match self.path.as_deref().and_then(|p| cache.get(p)) {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Contain)
                .into(),
            None => text("Loading image…").size(18).color(Color::WHITE).into(),
        };

        let card = column![
            row![
                Space::with_width(Length::Fill),
                button(text("✕").size(20))
                    .style(button::text)
                    .on_press(Message::ClosePreview),
            ],
            picture,
        ]
        .spacing(8)
        .width(Length::Fixed(900.0))
        .height(Length::Fixed(700.0));

        backdrop(
            self.fade.opacity(),
            Message::ClosePreview,
            opaque(card).into(),
        )
    }
}

/// Full-screen multi-image slider over the current result set.
///
/// The contract is two methods: `load_images` with the full ordered
/// sequence, then `show` with a starting index; forward/backward
/// navigation walks the loaded sequence and clamps at its ends.
#[derive(Debug, Default)]
pub struct SliderViewer {
    images: Vec<SearchResult>,
    index: usize,
    open: bool,
}

impl SliderViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the navigable sequence. Does not open the viewer.
    pub fn load_images(&mut self, images: Vec<SearchResult>) {
        self.images = images;
        self.index = 0;
    }

    /// Open at `index`. Out-of-range indexes are ignored.
    pub fn show(&mut self, index: usize) {
        if index < self.images.len() {
            self.index = index;
            self.open = true;
        }
    }

    pub fn next(&mut self) {
        if self.open && self.index + 1 < self.images.len() {
            self.index += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.open {
            self.index = self.index.saturating_sub(1);
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn images(&self) -> &[SearchResult] {
        &self.images
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&SearchResult> {
        if self.open {
            self.images.get(self.index)
        } else {
            None
        }
    }

    pub fn view<'a>(&'a self, cache: &'a ImageCache) -> Element<'a, Message> {
        let Some(result) = self.current() else {
            return Space::new(Length::Shrink, Length::Shrink).into();
        };

        let picture: Element<'a, Message> = match cache.get(&result.path) {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Contain)
                .into(),
            None => container(text("Loading image…").size(18).color(Color::WHITE))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let at_start = self.index == 0;
        let at_end = self.index + 1 == self.images.len();

        let nav = row![
            button(text("‹").size(32))
                .style(button::text)
                .on_press_maybe((!at_start).then_some(Message::SliderPrevious)),
            Space::with_width(Length::Fill),
            column![
                row![
                    text(&result.filename).size(16).color(Color::WHITE),
                    text(result.score_percent()).size(16).color(Color::WHITE),
                ]
                .spacing(16),
                text(&result.description).size(13).color(Color::WHITE),
                text(format!("{} / {}", self.index + 1, self.images.len()))
                    .size(13)
                    .color(Color::WHITE),
            ]
            .spacing(4),
            Space::with_width(Length::Fill),
            button(text("›").size(32))
                .style(button::text)
                .on_press_maybe((!at_end).then_some(Message::SliderNext)),
        ]
        .spacing(12);

        let card = column![
            row![
                Space::with_width(Length::Fill),
                button(text("✕").size(20))
                    .style(button::text)
                    .on_press(Message::CloseSlider),
            ],
            picture,
            nav,
        ]
        .spacing(8)
        .padding(24)
        .width(Length::Fill)
        .height(Length::Fill);

        backdrop(0.92, Message::CloseSlider, opaque(card).into())
    }
}

/// A dimmed full-window layer with `content` centered on top. Clicking
/// the dimmed area (not the content) emits `on_press`.
fn backdrop<'a>(
    opacity: f32,
    on_press: Message,
    content: Element<'a, Message>,
) -> Element<'a, Message> {
    let alpha = 0.85 * opacity;
    let dim = mouse_area(
        container(Space::new(Length::Fill, Length::Fill)).style(move |_theme| {
            iced::widget::container::Style {
                background: Some(Color { a: alpha, ..Color::BLACK }.into()),
                ..Default::default()
            }
        }),
    )
    .on_press(on_press);

    stack![
        dim,
        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
    ]
    .into()
}
