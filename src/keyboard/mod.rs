//! On-screen keyboard visualizing a platform's keybindings

pub mod client;
pub mod keybind;
pub mod layout;
pub mod location;
pub mod visualizer;

pub use client::KeybindClient;
pub use keybind::{parse_keybinds, Keybind, Platform};
pub use layout::{find_key, keyboard_layout, normalize_code, KeyCap, KeyWidth};
pub use location::PageLocation;
pub use visualizer::{FetchOutcome, FetchTicket, HoverInfo, KeyState, KeyboardViz};
