//! A single particle and its per-frame force integration

use rand::Rng;
use std::f32::consts::FRAC_PI_2;

use crate::core::config::ParticleConfig;
use crate::core::types::{Rgb, Vec2, Viewport};
use crate::particles::mouse::MouseState;
use crate::particles::theme::ThemePalette;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub base_size: f32,
    pub opacity: f32,
    pub base_opacity: f32,
    pub color: Rgb,
}

impl Particle {
    /// Spawn at a random position inside the viewport
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        config: &ParticleConfig,
        palette: &ThemePalette,
    ) -> Self {
        let size = rng.gen::<f32>() * (config.max_size - config.min_size) + config.min_size;
        let opacity = rng.gen::<f32>() * config.opacity_spread + config.opacity_min;
        Self {
            position: Vec2::new(
                rng.gen::<f32>() * viewport.width,
                rng.gen::<f32>() * viewport.height,
            ),
            velocity: Vec2::new(
                (rng.gen::<f32>() - 0.5) * config.base_speed,
                (rng.gen::<f32>() - 0.5) * config.base_speed,
            ),
            size,
            base_size: size,
            opacity,
            base_opacity: opacity,
            color: pick_color(rng, palette),
        }
    }

    /// True when the particle is lit up by the cursor
    pub fn is_energized(&self, threshold: f32) -> bool {
        self.opacity > self.base_opacity + threshold
    }

    /// Apply one frame of forces, then move and wrap
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        mouse: &MouseState,
        viewport: Viewport,
        config: &ParticleConfig,
        rng: &mut R,
    ) {
        match mouse.position {
            Some(cursor) => {
                let delta = cursor - self.position;
                let distance = delta.length();

                if distance < config.mouse_radius {
                    let force = (config.mouse_radius - distance) / config.mouse_radius;
                    let angle = delta.angle();
                    let toward = Vec2::from_angle(angle);

                    if distance > config.orbit_distance {
                        self.velocity += toward * (force * config.attraction_strength);
                    } else {
                        let repel =
                            (config.orbit_distance - distance) / config.orbit_distance;
                        self.velocity -= toward * (repel * config.orbit_repel_strength);
                    }

                    // swirl
                    self.velocity +=
                        Vec2::from_angle(angle + FRAC_PI_2) * (force * config.orbit_strength);

                    let influence = (mouse.speed * config.speed_influence).min(1.0);
                    self.velocity += Vec2::new(
                        (rng.gen::<f32>() - 0.5) * influence * config.jitter_strength,
                        (rng.gen::<f32>() - 0.5) * influence * config.jitter_strength,
                    );

                    self.size = self.base_size + force * config.grow_size;
                    self.opacity = (self.base_opacity + force * config.grow_opacity).min(1.0);
                } else {
                    self.ease_to_base(config.ease_rate);
                }

                self.velocity *= config.mouse_damping;
            }
            None => {
                self.velocity += Vec2::new(
                    (rng.gen::<f32>() - 0.5) * config.idle_drift,
                    (rng.gen::<f32>() - 0.5) * config.idle_drift,
                );
                self.velocity *= config.idle_damping;
                self.ease_to_base(config.ease_rate);
            }
        }

        self.position += self.velocity;
        self.wrap(viewport, config.wrap_margin);
    }

    fn ease_to_base(&mut self, rate: f32) {
        self.size += (self.base_size - self.size) * rate;
        self.opacity += (self.base_opacity - self.opacity) * rate;
    }

    /// Teleport to the opposite edge once past `margin`
    pub fn wrap(&mut self, viewport: Viewport, margin: f32) {
        if self.position.x < -margin {
            self.position.x = viewport.width + margin;
        }
        if self.position.x > viewport.width + margin {
            self.position.x = -margin;
        }
        if self.position.y < -margin {
            self.position.y = viewport.height + margin;
        }
        if self.position.y > viewport.height + margin {
            self.position.y = -margin;
        }
    }
}

/// Uniform pick from the palette's particle colors
pub fn pick_color<R: Rng + ?Sized>(rng: &mut R, palette: &ThemePalette) -> Rgb {
    palette.particles[rng.gen_range(0..palette.particles.len())]
}
