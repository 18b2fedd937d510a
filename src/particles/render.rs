//! Drawing primitives for the particle field
//!
//! The field never talks to a concrete backend. It issues primitives to a
//! [`Surface`], so the same frame can be rasterized into a terminal canvas or
//! recorded for inspection.

use crate::core::types::{Rgb, Vec2};

/// A color stop of a radial gradient, `offset` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgb,
    pub alpha: f32,
}

impl GradientStop {
    pub fn new(offset: f32, color: Rgb, alpha: f32) -> Self {
        Self { offset, color, alpha }
    }
}

/// Target the field draws onto
pub trait Surface {
    /// Start a new frame
    fn clear(&mut self);

    /// Disc filled with a radial gradient fading outward
    fn radial_glow(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32);

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);

    /// Axis-aligned square centered on `center`
    fn square(&mut self, center: Vec2, side: f32, color: Rgb, alpha: f32);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    RadialGlow {
        center: Vec2,
        radius: f32,
        stops: Vec<GradientStop>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        alpha: f32,
        width: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Square {
        center: Vec2,
        side: f32,
        color: Rgb,
        alpha: f32,
    },
}

/// Surface that keeps every primitive of the current frame
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn squares(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Square { .. }))
    }

    pub fn glows(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::RadialGlow { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for FrameRecorder {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn radial_glow(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::RadialGlow {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            alpha,
            width,
        });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn square(&mut self, center: Vec2, side: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Square {
            center,
            side,
            color,
            alpha,
        });
    }
}
