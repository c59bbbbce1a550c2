// Application shell: iced state, message routing and views

use crate::gateway::GeminiClient;
use crate::theme::{
    COLOR_ACCENT, COLOR_ERROR, COLOR_MUTED_DARK, CONTROLS_WIDTH, FONT_LG, FONT_MD, FONT_SM,
    FONT_XL, MAX_COLOR_INPUT_LENGTH, RADIUS, SPACING_LG, SPACING_MD, SPACING_SM, SWATCHES_PER_ROW,
};
use crate::types::EventType;
use crate::widgets::{color_input, loader, swatch};
use crate::workflow::{Completion, Phase, Stylist};
use iced::widget::{
    button, column, container, horizontal_rule, horizontal_space, image, opaque, pick_list, row,
    scrollable, text, Column, Row, Stack,
};
use iced::{keyboard, time, Border, Center, ContentFit, Element, Fill, Subscription, Task, Theme};
use std::sync::Arc;
use std::time::Duration;

const SPINNER_INTERVAL_MS: u64 = 120;

pub struct WeddingStylist {
    stylist: Stylist<GeminiClient>,
    preview: Option<image::Handle>,
    dark_mode: bool,
    spinner_frame: usize,
}

#[derive(Debug, Clone)]
pub enum Message {
    EventSelected(EventType),
    BrideColorChanged(String),
    GroomColorChanged(String),
    GenerateSuggestions,
    SuggestionSelected(usize),
    GeneratePreview,
    CopyPreview,
    Completed(Completion),
    SpinnerTick,
    ToggleTheme,
    KeyboardEvent(keyboard::Key, keyboard::Modifiers),
}

impl WeddingStylist {
    pub fn new(gateway: Arc<GeminiClient>) -> (Self, Task<Message>) {
        (
            Self {
                stylist: Stylist::new(gateway),
                preview: None,
                dark_mode: false,
                spinner_frame: 0,
            },
            Task::none(),
        )
    }

    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let keyboard_sub = iced::event::listen_with(|event, _status, _id| {
            if let iced::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) = event
            {
                Some(Message::KeyboardEvent(key, modifiers))
            } else {
                None
            }
        });

        let spinner_sub = if self.stylist.is_loading() {
            time::every(Duration::from_millis(SPINNER_INTERVAL_MS)).map(|_| Message::SpinnerTick)
        } else {
            Subscription::none()
        };

        Subscription::batch([keyboard_sub, spinner_sub])
    }

    // Rebuilds the image handle only when the shown image changes
    fn sync_preview(&mut self) {
        self.preview = self
            .stylist
            .image()
            .map(|img| image::Handle::from_bytes(img.bytes().to_vec()));
    }

    // Handles all application messages
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::KeyboardEvent(keyboard::Key::Named(keyboard::key::Named::Enter), modifiers)
                if modifiers.control()
                    && self.stylist.selected_suggestion().is_some()
                    && self.stylist.phase() != Phase::Imaging =>
            {
                self.update(Message::GeneratePreview)
            }
            Message::KeyboardEvent(..) => Task::none(),
            Message::ToggleTheme => {
                self.dark_mode = !self.dark_mode;
                Task::none()
            }
            Message::SpinnerTick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                Task::none()
            }
            Message::EventSelected(event) => {
                self.stylist.select_event(event);
                Task::none()
            }
            Message::BrideColorChanged(value) => {
                self.stylist
                    .set_bride_color(value.chars().take(MAX_COLOR_INPUT_LENGTH).collect());
                Task::none()
            }
            Message::GroomColorChanged(value) => {
                self.stylist
                    .set_groom_color(value.chars().take(MAX_COLOR_INPUT_LENGTH).collect());
                Task::none()
            }
            Message::GenerateSuggestions => {
                let request = self.stylist.request_suggestions();
                self.sync_preview();
                match request {
                    Some(future) => Task::perform(future, Message::Completed),
                    None => Task::none(),
                }
            }
            Message::SuggestionSelected(index) => {
                self.stylist.select_suggestion(index);
                Task::none()
            }
            Message::GeneratePreview => match self.stylist.request_preview() {
                Some(future) => Task::perform(future, Message::Completed),
                None => Task::none(),
            },
            Message::CopyPreview => match self.stylist.image() {
                Some(img) => iced::clipboard::write(img.data_uri()),
                None => Task::none(),
            },
            Message::Completed(completion) => {
                let is_preview = matches!(completion, Completion::Preview { .. });
                if self.stylist.apply(completion) && is_preview {
                    self.sync_preview();
                }
                Task::none()
            }
        }
    }

    // Renders main application view
    pub fn view(&self) -> Element<'_, Message> {
        container(
            column![
                self.view_header(),
                row![self.view_controls(), self.view_preview()].spacing(SPACING_LG),
            ]
            .spacing(SPACING_LG)
            .padding(SPACING_LG),
        )
        .width(Fill)
        .height(Fill)
        .into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let theme_label = if self.dark_mode {
            "Light Mode"
        } else {
            "Dark Mode"
        };
        row![
            text("Pakistani Wedding Color Stylist")
                .size(FONT_XL)
                .color(COLOR_ACCENT),
            horizontal_space(),
            button(theme_label).on_press(Message::ToggleTheme),
        ]
        .align_y(Center)
        .into()
    }

    fn view_controls(&self) -> Element<'_, Message> {
        let mut controls = Column::new()
            .spacing(SPACING_LG)
            .push(self.view_event_picker())
            .push(self.view_color_inputs())
            .push(
                button(text("Generate Color Combinations").size(FONT_LG))
                    .width(Fill)
                    .padding(SPACING_MD)
                    .style(button::primary)
                    .on_press_maybe(
                        self.stylist
                            .can_request_suggestions()
                            .then_some(Message::GenerateSuggestions),
                    ),
            );

        if !self.stylist.suggestions().is_empty() {
            controls = controls.push(self.view_suggestions());
        }

        if self.stylist.selected_suggestion().is_some() {
            controls = controls.push(
                column![
                    horizontal_rule(1),
                    text("4. Create Your Preview").size(FONT_LG),
                    button(text("Generate Image Preview (Ctrl+Enter)").size(FONT_LG))
                        .width(Fill)
                        .padding(SPACING_MD)
                        .style(button::success)
                        .on_press(Message::GeneratePreview),
                ]
                .spacing(SPACING_MD),
            );
        }

        if let Some(error) = self.stylist.error() {
            controls = controls.push(
                container(text(error).size(FONT_MD).color(COLOR_ERROR))
                    .center_x(Fill),
            );
        }

        scrollable(controls.padding(SPACING_MD))
            .width(CONTROLS_WIDTH)
            .height(Fill)
            .into()
    }

    fn view_event_picker(&self) -> Element<'_, Message> {
        let dress_code = self.stylist.dress_code();
        column![
            text("1. Choose The Event").size(FONT_LG),
            text("Each event has its own traditional attire.")
                .size(FONT_SM)
                .color(COLOR_MUTED_DARK),
            pick_list(
                EventType::ALL,
                Some(self.stylist.event_type()),
                Message::EventSelected
            )
            .width(Fill),
            container(
                column![
                    text(format!("Bride: {}", dress_code.bride)).size(FONT_SM),
                    text(format!("Groom: {}", dress_code.groom)).size(FONT_SM),
                ]
                .spacing(SPACING_SM)
            )
            .padding(SPACING_MD)
            .width(Fill)
            .style(container::rounded_box),
        ]
        .spacing(SPACING_SM)
        .into()
    }

    fn view_color_inputs(&self) -> Element<'_, Message> {
        column![
            text("2. Enter a Known Color").size(FONT_LG),
            text("Enter the dress color for either the bride or groom.")
                .size(FONT_SM)
                .color(COLOR_MUTED_DARK),
            color_input(
                "Bride's Dress Color",
                self.stylist.bride_color(),
                !self.stylist.bride_input_enabled(),
                Message::BrideColorChanged,
                Message::GenerateSuggestions,
            ),
            container(text("OR").size(FONT_SM).color(COLOR_MUTED_DARK)).center_x(Fill),
            color_input(
                "Groom's Dress Color",
                self.stylist.groom_color(),
                !self.stylist.groom_input_enabled(),
                Message::GroomColorChanged,
                Message::GenerateSuggestions,
            ),
        ]
        .spacing(SPACING_SM)
        .into()
    }

    fn view_suggestions(&self) -> Element<'_, Message> {
        let selected = self.stylist.selected_index();
        let tiles: Vec<Element<'_, Message>> = self
            .stylist
            .suggestions()
            .iter()
            .enumerate()
            .map(|(i, s)| swatch(&s.name, &s.hex, selected == Some(i), Message::SuggestionSelected(i)))
            .collect();

        let mut grid = Column::new().spacing(SPACING_MD);
        let mut tiles = tiles.into_iter().peekable();
        while tiles.peek().is_some() {
            let chunk: Vec<Element<'_, Message>> = tiles.by_ref().take(SWATCHES_PER_ROW).collect();
            grid = grid.push(Row::with_children(chunk).spacing(SPACING_MD));
        }

        column![
            horizontal_rule(1),
            text("3. Select a Complementary Color").size(FONT_LG),
            grid,
        ]
        .spacing(SPACING_MD)
        .into()
    }

    fn view_preview(&self) -> Element<'_, Message> {
        let base: Element<'_, Message> = match &self.preview {
            Some(handle) => image(handle.clone())
                .width(Fill)
                .height(Fill)
                .content_fit(ContentFit::Contain)
                .into(),
            None if !self.stylist.is_loading() => column![
                text("Image Preview").size(FONT_LG),
                text("Your generated wedding attire will appear here.")
                    .size(FONT_SM)
                    .color(COLOR_MUTED_DARK),
            ]
            .spacing(SPACING_SM)
            .align_x(Center)
            .into(),
            None => Column::new().into(),
        };

        let mut layers = Stack::new()
            .width(Fill)
            .height(Fill)
            .push(container(base).center_x(Fill).center_y(Fill));
        if let Some(message) = self.stylist.loading_message() {
            layers = layers.push(opaque(loader(message, self.spinner_frame)));
        }

        let mut panel = Column::new().spacing(SPACING_SM).push(layers);
        if self.preview.is_some() {
            panel = panel.push(
                row![
                    horizontal_space(),
                    button(text("Copy as Data URI").size(FONT_SM))
                        .style(button::secondary)
                        .on_press(Message::CopyPreview),
                ]
                .align_y(Center),
            );
        }

        container(panel)
            .width(Fill)
            .height(Fill)
            .padding(SPACING_MD)
            .style(|theme: &Theme| container::Style {
                border: Border {
                    color: COLOR_ACCENT,
                    width: 1.0,
                    radius: RADIUS.into(),
                },
                ..container::rounded_box(theme)
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn app() -> WeddingStylist {
        let config = Config::from_lookup(|name| (name == "API_KEY").then(|| "k".to_string()))
            .expect("config");
        let gateway = GeminiClient::new(config).expect("client");
        WeddingStylist::new(Arc::new(gateway)).0
    }

    #[test]
    fn typing_a_color_locks_the_other_field() {
        let mut app = app();
        let _ = app.update(Message::BrideColorChanged("Emerald Green".into()));
        let _ = app.update(Message::GroomColorChanged("Gold".into()));
        assert_eq!(app.stylist.bride_color(), "Emerald Green");
        assert_eq!(app.stylist.groom_color(), "");

        let _ = app.update(Message::BrideColorChanged(String::new()));
        let _ = app.update(Message::GroomColorChanged("Gold".into()));
        assert_eq!(app.stylist.groom_color(), "Gold");
    }

    #[test]
    fn long_input_is_truncated() {
        let mut app = app();
        let _ = app.update(Message::BrideColorChanged("x".repeat(500)));
        assert_eq!(app.stylist.bride_color().len(), MAX_COLOR_INPUT_LENGTH);
    }

    #[test]
    fn blank_generate_sets_error_and_stays_idle() {
        let mut app = app();
        let _ = app.update(Message::GenerateSuggestions);
        assert!(app.stylist.error().is_some());
        assert_eq!(app.stylist.phase(), Phase::Idle);
        assert!(app.preview.is_none());
    }

    #[test]
    fn preview_without_selection_sets_error() {
        let mut app = app();
        let _ = app.update(Message::GeneratePreview);
        assert_eq!(app.stylist.error(), Some("Please select a suggested color first."));
        assert!(app.preview.is_none());
    }

    #[test]
    fn event_and_theme_updates() {
        let mut app = app();
        let _ = app.update(Message::EventSelected(EventType::Valima));
        assert_eq!(app.stylist.dress_code().groom, "3-Piece Suit");

        assert_eq!(app.theme(), Theme::Light);
        let _ = app.update(Message::ToggleTheme);
        assert_eq!(app.theme(), Theme::Dark);
    }

    #[test]
    fn ctrl_enter_without_selection_does_nothing() {
        let mut app = app();
        let _ = app.update(Message::KeyboardEvent(
            keyboard::Key::Named(keyboard::key::Named::Enter),
            keyboard::Modifiers::CTRL,
        ));
        assert_eq!(app.stylist.error(), None);
        assert_eq!(app.stylist.phase(), Phase::Idle);
    }

    #[test]
    fn stale_completion_leaves_state_untouched() {
        let mut app = app();
        let _ = app.update(Message::Completed(Completion::Suggestions {
            seq: 42,
            result: Ok(r##"[{"name":"Gold","hex":"#FFD700"}]"##.into()),
        }));
        assert!(app.stylist.suggestions().is_empty());
        assert_eq!(app.stylist.phase(), Phase::Idle);
    }
}
