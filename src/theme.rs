// Design system tokens for consistent styling

use iced::Color;

// Font sizes
pub const FONT_SM: f32 = 13.0;
pub const FONT_MD: f32 = 14.0;
pub const FONT_LG: f32 = 18.0;
pub const FONT_XL: f32 = 26.0;
pub const FONT_SPINNER: f32 = 40.0;

// Spacing
pub const SPACING_XS: u16 = 2;
pub const SPACING_SM: u16 = 5;
pub const SPACING_MD: u16 = 10;
pub const SPACING_LG: u16 = 20;

// Sizes
pub const SWATCH_DOT: f32 = 20.0;
pub const SWATCH_TILE_HEIGHT: f32 = 64.0;
pub const SWATCHES_PER_ROW: usize = 5;
pub const CONTROLS_WIDTH: f32 = 460.0;
pub const RADIUS: f32 = 8.0;

// Colors
pub const COLOR_ERROR: Color = Color::from_rgb(0.94, 0.27, 0.27);
pub const COLOR_ACCENT: Color = Color::from_rgb(0.93, 0.28, 0.6);
pub const COLOR_MUTED_DARK: Color = Color::from_rgb(0.5, 0.5, 0.5);
pub const COLOR_OUTLINE: Color = Color::from_rgb(0.82, 0.82, 0.82);

// Input limits
pub const MAX_COLOR_INPUT_LENGTH: usize = 64;

// Window
pub const WINDOW_WIDTH: f32 = 1100.0;
pub const WINDOW_HEIGHT: f32 = 760.0;
