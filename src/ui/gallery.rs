use iced::widget::{
    button, column, container, horizontal_space, image as iced_image, mouse_area, responsive, row, scrollable, text,
    tooltip, Column, Row,
};
use iced::{mouse, Alignment, Element, Length};

use super::viewer::{fit_within, FullView, THUMBNAIL_BOUNDS};
use crate::state::controller::Thumbnail;
use crate::Message;

/// Build a display handle from RGBA pixels
pub fn handle_for(pixels: &image::RgbaImage) -> iced_image::Handle {
    iced_image::Handle::from_rgba(pixels.width(), pixels.height(), pixels.as_raw().clone())
}

/// Shown while there is nothing to display
pub fn placeholder<'a>() -> Element<'a, Message> {
    text("Describe the image and press Generate to begin...")
        .size(18)
        .into()
}

/// Thumbnails laid out by their grid cell
///
/// `handles` is parallel to `thumbnails`.
pub fn thumbnail_grid<'a>(thumbnails: &'a [Thumbnail], handles: &'a [iced_image::Handle]) -> Element<'a, Message> {
    let mut rows: Vec<Vec<Element<'a, Message>>> = Vec::new();

    for (thumbnail, handle) in thumbnails.iter().zip(handles) {
        if rows.len() <= thumbnail.row {
            rows.resize_with(thumbnail.row + 1, Vec::new);
        }
        let cells = &mut rows[thumbnail.row];
        cells.insert(thumbnail.column.min(cells.len()), thumbnail_cell(thumbnail, handle));
    }

    let grid = Column::with_children(rows.into_iter().map(|cells| -> Element<'a, Message> {
        Row::with_children(cells)
            .spacing(20)
            .align_y(Alignment::Center)
            .into()
    }))
    .spacing(20)
    .align_x(Alignment::Center);

    scrollable(container(grid).center_x(Length::Fill)).into()
}

/// One clickable thumbnail; the click carries the file path it was built with
fn thumbnail_cell<'a>(thumbnail: &'a Thumbnail, handle: &'a iced_image::Handle) -> Element<'a, Message> {
    let pixels = &thumbnail.image.pixels;
    let (width, height) = fit_within(pixels.width(), pixels.height(), THUMBNAIL_BOUNDS);

    let picture = iced_image(handle.clone())
        .width(Length::Fixed(width as f32))
        .height(Length::Fixed(height as f32));

    let clickable = mouse_area(picture)
        .on_press(Message::OpenFullView(thumbnail.image.path.clone()))
        .interaction(mouse::Interaction::Pointer);

    tooltip(clickable, text("Click to view full size").size(12), tooltip::Position::Bottom).into()
}

/// A saved image, fitted to the preview area left under its title bar
pub fn full_view<'a>(view: &'a FullView, handle: &'a iced_image::Handle) -> Element<'a, Message> {
    let name = view
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let bar = row![
        text(name).size(14),
        horizontal_space(),
        button("Close").on_press(Message::CloseFullView).padding(5),
    ]
    .align_y(Alignment::Center);

    let picture = responsive(move |area| {
        let (width, height) = view.fitted(Some((area.width, area.height)));

        container(
            iced_image(handle.clone())
                .width(Length::Fixed(width as f32))
                .height(Length::Fixed(height as f32)),
        )
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    });

    column![bar, picture].spacing(10).into()
}
