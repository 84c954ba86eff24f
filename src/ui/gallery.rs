use iced::widget::{column, container, mouse_area, row, text, Space};
use iced::{ContentFit, Element, Length};
use iced_aw::Wrap;

use crate::api::types::SearchResult;
use crate::images::ImageCache;
use crate::layout::{lay_out, LayoutClass, TILE_GAP};
use crate::Message;

/// Render the ranked results as a heterogeneous tile grid.
///
/// Tiles keep backend rank order; an empty result set renders exactly
/// one placeholder instead of an empty grid. Clicking tile `i` emits
/// its index so the update loop can hand the full sequence plus `i` to
/// the slider.
pub fn view<'a>(results: &'a [SearchResult], cache: &'a ImageCache) -> Element<'a, Message> {
    if results.is_empty() {
        return container(text("No similar images found").size(24))
            .width(Length::Fill)
            .padding(48)
            .center_x(Length::Fill)
            .into();
    }

    let tiles: Vec<Element<'a, Message>> = lay_out(results)
        .into_iter()
        .enumerate()
        .map(|(index, (result, class))| tile(index, result, class, cache))
        .collect();

    container(
        Wrap::with_elements(tiles)
            .spacing(TILE_GAP)
            .line_spacing(TILE_GAP),
    )
    .padding(16)
    .width(Length::Fill)
    .into()
}

/// One clickable gallery tile: image (or placeholder while its bytes
/// load), filename, score percentage, description
fn tile<'a>(
    index: usize,
    result: &'a SearchResult,
    class: LayoutClass,
    cache: &'a ImageCache,
) -> Element<'a, Message> {
    let (width, height) = class.tile_size();

    let picture: Element<'a, Message> = match cache.get(&result.path) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("Loading…").size(14))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    let header = row![
        text(&result.filename).size(14),
        Space::with_width(Length::Fill),
        text(result.score_percent()).size(14),
    ]
    .spacing(8);

    let card = column![
        container(picture)
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .clip(true)
            .style(container::rounded_box),
        header,
        text(&result.description).size(12),
    ]
    .spacing(6)
    .width(Length::Fixed(width));

    mouse_area(card)
        .on_press(Message::GalleryItemClicked(index))
        .into()
}
