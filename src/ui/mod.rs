//! UI module - ratatui front end hosting the widgets

pub mod app;
pub mod canvas;
pub mod render;
pub mod state;

pub use app::{viewport_for, App, CELL_HEIGHT, CELL_WIDTH, FRAME};
pub use render::draw;
pub use state::{Focus, HitTarget, LogCategory, LogEntry, UiState};
