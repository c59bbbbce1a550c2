// Presentational widgets: color input, suggestion swatch, loading overlay

use crate::color::swatch_color;
use crate::theme::{
    COLOR_ACCENT, COLOR_OUTLINE, FONT_LG, FONT_SM, FONT_SPINNER, RADIUS, SPACING_MD, SPACING_SM,
    SWATCH_DOT, SWATCH_TILE_HEIGHT,
};
use iced::widget::{column, container, mouse_area, row, text, text_input, Space};
use iced::{Border, Center, Color, Element, Fill, Theme};

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Labeled text field with a live swatch of whatever color the text names.
///
/// A disabled field gets no input handler, so iced renders it read-only.
pub fn color_input<'a, Message: Clone + 'a>(
    label: &'a str,
    value: &'a str,
    disabled: bool,
    on_change: impl Fn(String) -> Message + 'a,
    on_submit: Message,
) -> Element<'a, Message> {
    let preview = swatch_color(value);

    let mut input = text_input("e.g., Baby Pink or #FFC0CB", value).width(Fill);
    if !disabled {
        input = input.on_input(on_change).on_submit(on_submit);
    }

    column![
        text(label).size(FONT_SM),
        row![color_dot(preview), input]
            .spacing(SPACING_MD)
            .align_y(Center),
    ]
    .spacing(SPACING_SM)
    .into()
}

fn color_dot<'a, Message: 'a>(color: Color) -> Element<'a, Message> {
    container(Space::new(SWATCH_DOT, SWATCH_DOT))
        .style(move |_theme: &Theme| container::Style {
            background: Some(color.into()),
            border: Border {
                color: COLOR_OUTLINE,
                width: 1.0,
                radius: (SWATCH_DOT / 2.0).into(),
            },
            ..container::Style::default()
        })
        .into()
}

/// Clickable tile for one suggested color
pub fn swatch<'a, Message: Clone + 'a>(
    name: &'a str,
    hex: &'a str,
    selected: bool,
    on_press: Message,
) -> Element<'a, Message> {
    let fill = swatch_color(hex);
    let (outline, width) = if selected {
        (COLOR_ACCENT, 4.0)
    } else {
        (COLOR_OUTLINE, 1.0)
    };

    let tile = container(Space::new(Fill, SWATCH_TILE_HEIGHT))
        .width(Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(fill.into()),
            border: Border {
                color: outline,
                width,
                radius: RADIUS.into(),
            },
            ..container::Style::default()
        });

    mouse_area(
        column![tile, text(name).size(FONT_SM)]
            .spacing(SPACING_SM)
            .align_x(Center)
            .width(Fill),
    )
    .on_press(on_press)
    .into()
}

pub fn spinner_glyph(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Full-cover translucent layer with a spinner and status message
pub fn loader<'a, Message: 'a>(message: &'a str, frame: usize) -> Element<'a, Message> {
    container(
        column![
            text(spinner_glyph(frame)).size(FONT_SPINNER).color(COLOR_ACCENT),
            text(message).size(FONT_LG),
        ]
        .spacing(SPACING_MD)
        .align_x(Center),
    )
    .center_x(Fill)
    .center_y(Fill)
    .style(|theme: &Theme| {
        let base = theme.extended_palette().background.base.color;
        container::Style {
            background: Some(Color { a: 0.8, ..base }.into()),
            ..container::Style::default()
        }
    })
    .into()
}
