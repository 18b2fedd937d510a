//! Rasterize recorded particle frames onto a ratatui canvas

use ratatui::style::Color;
use ratatui::widgets::canvas::{Circle, Context, Line, Points, Rectangle};

use crate::core::types::{Rgb, Vec2, Viewport};
use crate::particles::render::{DrawCommand, GradientStop};

/// Canvas background; translucency is flattened against it
pub const BACKGROUND: Rgb = Rgb::new(0x1a, 0x1b, 0x26);

/// Rings used to approximate a radial gradient
const GLOW_RINGS: usize = 3;

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Canvas y grows upward, screen y grows downward
fn flip(pos: Vec2, viewport: Viewport) -> (f64, f64) {
    (pos.x as f64, (viewport.height - pos.y) as f64)
}

/// Color and alpha of a gradient at `offset`, linearly interpolated
fn sample_gradient(stops: &[GradientStop], offset: f32) -> (Rgb, f32) {
    let Some(first) = stops.first() else {
        return (BACKGROUND, 0.0);
    };
    let mut prev = *first;
    for stop in stops {
        if offset <= stop.offset {
            let span = stop.offset - prev.offset;
            let t = if span > 0.0 { (offset - prev.offset) / span } else { 1.0 };
            let color = stop.color.over(prev.color, t);
            let alpha = prev.alpha + (stop.alpha - prev.alpha) * t;
            return (color, alpha);
        }
        prev = *stop;
    }
    (prev.color, prev.alpha)
}

pub fn paint(ctx: &mut Context<'_>, commands: &[DrawCommand], viewport: Viewport) {
    for command in commands {
        match command {
            DrawCommand::Clear => {}
            DrawCommand::RadialGlow {
                center,
                radius,
                stops,
            } => {
                let (x, y) = flip(*center, viewport);
                for ring in 1..=GLOW_RINGS {
                    let offset = ring as f32 / GLOW_RINGS as f32;
                    let (color, alpha) = sample_gradient(stops, offset - 0.5 / GLOW_RINGS as f32);
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: (*radius * offset) as f64,
                        color: to_color(color.over(BACKGROUND, alpha)),
                    });
                }
            }
            DrawCommand::Line {
                from,
                to,
                color,
                alpha,
                ..
            } => {
                let (x1, y1) = flip(*from, viewport);
                let (x2, y2) = flip(*to, viewport);
                ctx.draw(&Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: to_color(color.over(BACKGROUND, *alpha)),
                });
            }
            DrawCommand::Circle {
                center,
                color,
                alpha,
                ..
            } => {
                let coords = [flip(*center, viewport)];
                ctx.draw(&Points {
                    coords: &coords,
                    color: to_color(color.over(BACKGROUND, *alpha)),
                });
            }
            DrawCommand::Square {
                center,
                side,
                color,
                alpha,
            } => {
                let (x, y) = flip(*center, viewport);
                let half = (*side / 2.0) as f64;
                ctx.draw(&Rectangle {
                    x: x - half,
                    y: y - half,
                    width: *side as f64,
                    height: *side as f64,
                    color: to_color(color.over(BACKGROUND, *alpha)),
                });
            }
        }
    }
}
