//! The particle field simulation context
//!
//! Owns the pool, the pointer state, the theme and the RNG. The host calls
//! [`ParticleField::step`] and [`ParticleField::draw`] once per frame and
//! forwards resize, pointer and theme-change signals.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::ParticleConfig;
use crate::core::types::{Rgb, Vec2, Viewport};
use crate::particles::mouse::MouseState;
use crate::particles::particle::{pick_color, Particle};
use crate::particles::render::{GradientStop, Surface};
use crate::particles::theme::Theme;

/// Pool size for a viewport: scaled by area, clamped to the configured bounds
pub fn pool_size(viewport: Viewport, config: &ParticleConfig) -> usize {
    let reference = config.reference_width * config.reference_height;
    let scaled = (config.particle_count as f64 * (viewport.area() as f64 / reference as f64))
        .floor()
        .max(0.0) as usize;
    scaled.clamp(config.min_particles, config.max_particles)
}

pub struct ParticleField {
    config: ParticleConfig,
    viewport: Viewport,
    theme: Theme,
    particles: Vec<Particle>,
    mouse: MouseState,
    rng: ChaCha8Rng,
    frame: u64,
}

impl ParticleField {
    /// Build the field and populate it unless reduced motion is requested
    pub fn new(config: ParticleConfig, viewport: Viewport) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let theme = config.theme;
        let mut field = Self {
            config,
            viewport,
            theme,
            particles: Vec::new(),
            mouse: MouseState::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            frame: 0,
        };
        if field.enabled() {
            field.init(viewport);
        } else {
            tracing::info!("Reduced motion requested, particle field disabled");
        }
        field
    }

    /// False under reduced motion; the host must not draw or step the field
    pub fn enabled(&self) -> bool {
        !self.config.reduced_motion
    }

    /// Rebuild the whole pool for `viewport`
    pub fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.frame = 0;
        if !self.enabled() {
            self.particles.clear();
            return;
        }
        let count = pool_size(viewport, &self.config);
        let palette = self.theme.palette();
        self.particles = (0..count)
            .map(|_| Particle::spawn(&mut self.rng, viewport, &self.config, &palette))
            .collect();
        tracing::debug!(
            count,
            width = viewport.width,
            height = viewport.height,
            "Particle pool initialized"
        );
    }

    /// Window resized: the pool is recreated from scratch
    pub fn resize(&mut self, viewport: Viewport) {
        self.init(viewport);
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.mouse.move_to(x, y);
    }

    pub fn mouse_leave(&mut self) {
        self.mouse.leave();
    }

    /// Theme-change signal: recolor in place, keep motion state
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let palette = theme.palette();
        for particle in &mut self.particles {
            particle.color = pick_color(&mut self.rng, &palette);
        }
        tracing::debug!(theme = %theme, "Particles recolored");
    }

    /// Advance one animation frame
    pub fn step(&mut self) {
        if !self.enabled() {
            return;
        }
        self.repel_particles();
        for particle in &mut self.particles {
            particle.update(&self.mouse, self.viewport, &self.config, &mut self.rng);
        }
        self.frame += 1;
    }

    /// Push apart every pair closer than the repel distance
    fn repel_particles(&mut self) {
        let repel_distance = self.config.repel_distance;
        let strength = self.config.repel_strength;

        for i in 0..self.particles.len() {
            let (head, tail) = self.particles.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                let delta = a.position - b.position;
                let distance = delta.length();
                if distance < repel_distance && distance > 0.0 {
                    let force = (repel_distance - distance) / repel_distance * strength;
                    let push = Vec2::from_angle(delta.angle()) * force;
                    a.velocity += push;
                    b.velocity -= push;
                }
            }
        }
    }

    /// Render the current frame
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear();
        if !self.enabled() {
            return;
        }

        let palette = self.theme.palette();
        if let Some(cursor) = self.mouse.position {
            self.draw_mouse_glow(
                surface,
                cursor,
                palette.mouse_connection,
                palette.particle_connection,
            );
            self.draw_mouse_connections(surface, cursor, palette.mouse_connection);
            self.draw_particle_connections(surface, cursor, palette.particle_connection);
        }

        let square = self.theme.square_particles();
        for p in &self.particles {
            if !square && p.is_energized(self.config.glow_threshold) {
                surface.radial_glow(
                    p.position,
                    p.size * 2.0,
                    &[
                        GradientStop::new(0.0, p.color, 0.25),
                        GradientStop::new(1.0, p.color, 0.0),
                    ],
                );
            }
            if square {
                surface.square(p.position, p.size * 2.0, p.color, p.opacity);
            } else {
                surface.circle(p.position, p.size, p.color, p.opacity);
            }
        }
    }

    fn draw_mouse_glow(&self, surface: &mut dyn Surface, cursor: Vec2, inner: Rgb, middle: Rgb) {
        surface.radial_glow(
            cursor,
            self.config.mouse_radius * self.config.mouse_glow_scale,
            &[
                GradientStop::new(0.0, inner, 0.08),
                GradientStop::new(0.5, middle, 0.03),
                GradientStop::new(1.0, middle, 0.0),
            ],
        );
    }

    fn draw_mouse_connections(&self, surface: &mut dyn Surface, cursor: Vec2, color: Rgb) {
        let radius = self.config.mouse_connection_radius;
        for p in &self.particles {
            let distance = p.position.distance(&cursor);
            if distance < radius {
                let alpha = (1.0 - distance / radius) * self.config.mouse_link_alpha;
                surface.line(p.position, cursor, color, alpha, 1.0);
            }
        }
    }

    /// Links between pairs that are both near the cursor and near each other
    fn draw_particle_connections(&self, surface: &mut dyn Surface, cursor: Vec2, color: Rgb) {
        let radius = self.config.mouse_radius;
        let link = self.config.link_distance;
        let near: Vec<&Particle> = self
            .particles
            .iter()
            .filter(|p| p.position.distance(&cursor) <= radius)
            .collect();

        for (i, a) in near.iter().enumerate() {
            for b in &near[i + 1..] {
                let distance = a.position.distance(&b.position);
                if distance < link {
                    let alpha = (1.0 - distance / link) * self.config.pair_link_alpha;
                    surface.line(a.position, b.position, color, alpha, 0.5);
                }
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Frames stepped since the last (re)initialization
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::render::{DrawCommand, FrameRecorder};

    fn seeded(theme: Theme) -> ParticleConfig {
        ParticleConfig {
            seed: Some(42),
            theme,
            ..ParticleConfig::default()
        }
    }

    #[test]
    fn test_pool_size_reference_area() {
        let config = ParticleConfig::default();
        assert_eq!(pool_size(Viewport::new(1920.0, 1080.0), &config), 100);
    }

    #[test]
    fn test_pool_size_clamped() {
        let config = ParticleConfig::default();
        assert_eq!(pool_size(Viewport::new(320.0, 240.0), &config), 40);
        assert_eq!(pool_size(Viewport::new(7680.0, 4320.0), &config), 180);
        assert_eq!(pool_size(Viewport::new(0.0, 0.0), &config), 40);
    }

    #[test]
    fn test_resize_rebuilds_pool() {
        let mut field = ParticleField::new(seeded(Theme::Tokyo), Viewport::new(1920.0, 1080.0));
        assert_eq!(field.particles().len(), 100);
        field.step();
        assert_eq!(field.frame(), 1);
        field.resize(Viewport::new(3840.0, 2160.0));
        assert_eq!(field.particles().len(), 180);
        assert_eq!(field.frame(), 0);
    }

    #[test]
    fn test_reduced_motion_disables_field() {
        let config = ParticleConfig {
            reduced_motion: true,
            ..seeded(Theme::Tokyo)
        };
        let mut field = ParticleField::new(config, Viewport::new(1920.0, 1080.0));
        assert!(!field.enabled());
        assert!(field.particles().is_empty());
        field.step();
        assert_eq!(field.frame(), 0);

        let mut surface = FrameRecorder::new();
        field.draw(&mut surface);
        assert_eq!(surface.commands, vec![DrawCommand::Clear]);
    }

    #[test]
    fn test_theme_change_keeps_motion() {
        let mut field = ParticleField::new(seeded(Theme::Tokyo), Viewport::new(800.0, 600.0));
        field.step();
        let before: Vec<(Vec2, Vec2)> = field
            .particles()
            .iter()
            .map(|p| (p.position, p.velocity))
            .collect();

        field.set_theme(Theme::Gruvbox);

        let palette = Theme::Gruvbox.palette();
        for (p, (pos, vel)) in field.particles().iter().zip(before) {
            assert_eq!(p.position, pos);
            assert_eq!(p.velocity, vel);
            assert!(palette.particles.contains(&p.color));
        }
    }

    #[test]
    fn test_close_pair_is_pushed_apart() {
        let mut field = ParticleField::new(seeded(Theme::Tokyo), Viewport::new(800.0, 600.0));
        let particles = field.particles_mut();
        for (i, p) in particles.iter_mut().enumerate() {
            p.position = Vec2::new(1000.0 + i as f32 * 100.0, 300.0);
            p.velocity = Vec2::ZERO;
        }
        particles[0].position = Vec2::new(400.0, 300.0);
        particles[1].position = Vec2::new(410.0, 300.0);

        field.repel_particles();

        let p = field.particles();
        assert!(p[0].velocity.x < 0.0);
        assert!(p[1].velocity.x > 0.0);
        assert!((p[0].velocity.x + p[1].velocity.x).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_pair_is_left_alone() {
        let mut field = ParticleField::new(seeded(Theme::Tokyo), Viewport::new(800.0, 600.0));
        for (i, p) in field.particles_mut().iter_mut().enumerate() {
            p.position = Vec2::new(i as f32 * 100.0, 0.0);
            p.velocity = Vec2::ZERO;
        }
        let origin = field.particles()[0].position;
        field.particles_mut()[1].position = origin;
        field.repel_particles();
        assert_eq!(field.particles()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_draw_without_mouse_has_no_lines() {
        let field = ParticleField::new(seeded(Theme::Nord), Viewport::new(800.0, 600.0));
        let mut surface = FrameRecorder::new();
        field.draw(&mut surface);
        assert_eq!(surface.lines().count(), 0);
        assert_eq!(surface.circles(), field.particles().len());
        assert_eq!(surface.squares(), 0);
    }

    #[test]
    fn test_gruvbox_draws_squares_without_glow() {
        let mut field = ParticleField::new(seeded(Theme::Gruvbox), Viewport::new(800.0, 600.0));
        for p in field.particles_mut() {
            p.opacity = 1.0;
            p.base_opacity = 0.3;
        }
        let mut surface = FrameRecorder::new();
        field.draw(&mut surface);
        assert_eq!(surface.squares(), field.particles().len());
        assert_eq!(surface.circles(), 0);
        assert_eq!(surface.glows(), 0);
    }

    #[test]
    fn test_energized_particles_glow() {
        let mut field = ParticleField::new(seeded(Theme::Catppuccin), Viewport::new(800.0, 600.0));
        let first = &mut field.particles_mut()[0];
        first.base_opacity = 0.3;
        first.opacity = 0.9;
        let mut surface = FrameRecorder::new();
        field.draw(&mut surface);
        assert!(surface.glows() >= 1);
    }

    #[test]
    fn test_mouse_links_fade_with_distance() {
        let mut field = ParticleField::new(seeded(Theme::Tokyo), Viewport::new(800.0, 600.0));
        for (i, p) in field.particles_mut().iter_mut().enumerate() {
            p.position = Vec2::new(5000.0 + i as f32, 5000.0);
        }
        field.particles_mut()[0].position = Vec2::new(100.0, 100.0);
        field.particles_mut()[1].position = Vec2::new(100.0, 200.0);
        field.mouse_move(100.0, 50.0);

        let mut surface = FrameRecorder::new();
        field.draw(&mut surface);

        let alphas: Vec<f32> = surface
            .lines()
            .filter_map(|c| match c {
                DrawCommand::Line { to, alpha, width, .. } if *to == Vec2::new(100.0, 50.0) => {
                    assert_eq!(*width, 1.0);
                    Some(*alpha)
                }
                _ => None,
            })
            .collect();
        assert_eq!(alphas.len(), 2);
        assert!((alphas[0] - 0.3).abs() < 1e-5);
        assert!((alphas[1] - 0.1).abs() < 1e-5);
    }
}
