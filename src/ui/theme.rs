//! Theme constants for the Caro GUI

use egui::Color32;

// Board colors - paper grid
pub const BOARD_BG: Color32 = Color32::from_rgb(245, 240, 225);
pub const GRID_LINE: Color32 = Color32::from_rgb(120, 110, 95);
pub const COORD_LABEL: Color32 = Color32::from_rgb(90, 80, 70);

// Marks
pub const X_MARK: Color32 = Color32::from_rgb(200, 45, 45);
pub const O_MARK: Color32 = Color32::from_rgb(40, 90, 190);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(250, 200, 60);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 200, 80);

pub fn hover_valid() -> Color32 {
    Color32::from_rgba_unmultiplied(80, 80, 80, 50)
}

// Panel colors - dark modern theme
pub const PANEL_BG: Color32 = Color32::from_rgb(25, 27, 31);
pub const CARD_BG: Color32 = Color32::from_rgb(35, 38, 43);
pub const BUTTON_BG: Color32 = Color32::from_rgb(50, 53, 58);
pub const BOARD_AREA_BG: Color32 = Color32::from_rgb(40, 42, 46);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Status colors
pub const STATUS_TURN: Color32 = Color32::from_rgb(80, 200, 120);
pub const STATUS_THINKING: Color32 = Color32::from_rgb(255, 180, 50);
pub const STATUS_ERROR: Color32 = Color32::from_rgb(80, 60, 30);

// Sizes
pub const BOARD_MARGIN: f32 = 28.0;
pub const MARK_RATIO: f32 = 0.32;
pub const MARK_STROKE_WIDTH: f32 = 3.0;
pub const GRID_LINE_WIDTH: f32 = 1.0;
pub const LAST_MOVE_MARKER_WIDTH: f32 = 2.0;
pub const WIN_STROKE_WIDTH: f32 = 4.0;
