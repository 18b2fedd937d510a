//! Dotfolio - Widgets for a dotfiles portfolio
//!
//! An ambient particle field, a scripted terminal with a toy prompt, and a
//! keyboard visualizer for window-manager keybinds.

pub mod core;
pub mod keyboard;
pub mod particles;
pub mod terminal;
pub mod ui;
