//! Ambient particle field reacting to the pointer

pub mod field;
pub mod mouse;
pub mod particle;
pub mod render;
pub mod theme;

pub use field::{pool_size, ParticleField};
pub use mouse::MouseState;
pub use particle::Particle;
pub use render::{DrawCommand, FrameRecorder, GradientStop, Surface};
pub use theme::{Theme, ThemePalette};
