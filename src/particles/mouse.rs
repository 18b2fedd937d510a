//! Pointer tracking for the particle field

use crate::core::types::Vec2;

/// Last known pointer position and how fast it is moving
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    pub position: Option<Vec2>,
    pub previous: Option<Vec2>,
    /// Distance covered by the last move event
    pub speed: f32,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.previous = self.position;
        let current = Vec2::new(x, y);
        self.position = Some(current);
        if let Some(prev) = self.previous {
            self.speed = current.distance(&prev);
        }
    }

    /// Pointer left the window
    pub fn leave(&mut self) {
        self.position = None;
        self.speed = 0.0;
    }

    pub fn is_known(&self) -> bool {
        self.position.is_some()
    }
}
