//! GUI module for the Caro game
//!
//! This module provides a native Rust GUI using egui/eframe. It only talks
//! to the game through [`GameSession`](crate::session::GameSession).

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::CaroApp;
pub use game_state::{status_text, Blink, MenuChoice, Screen, ViewState};
