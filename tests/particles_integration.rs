//! Particle field integration tests

use dotfolio::core::config::ParticleConfig;
use dotfolio::core::types::{Vec2, Viewport};
use dotfolio::particles::*;
use proptest::prelude::*;

fn seeded_config() -> ParticleConfig {
    ParticleConfig {
        seed: Some(7),
        ..ParticleConfig::default()
    }
}

// ============================================================================
// Pool sizing
// ============================================================================

#[test]
fn test_reference_viewport_gets_reference_count() {
    let config = seeded_config();
    let field = ParticleField::new(config, Viewport::new(1920.0, 1080.0));
    assert_eq!(field.particles().len(), 100);
}

#[test]
fn test_small_and_huge_viewports_are_clamped() {
    let config = seeded_config();
    assert_eq!(pool_size(Viewport::new(320.0, 240.0), &config), 40);
    assert_eq!(pool_size(Viewport::new(7680.0, 4320.0), &config), 180);
    assert_eq!(pool_size(Viewport::new(0.0, 0.0), &config), 40);
}

#[test]
fn test_resize_rebuilds_pool() {
    let mut field = ParticleField::new(seeded_config(), Viewport::new(1920.0, 1080.0));
    field.resize(Viewport::new(3840.0, 2160.0));
    assert_eq!(field.particles().len(), 180);
    assert_eq!(field.frame(), 0);
    for p in field.particles() {
        assert!(p.position.x >= 0.0 && p.position.x <= 3840.0);
        assert!(p.position.y >= 0.0 && p.position.y <= 2160.0);
    }
}

proptest! {
    #[test]
    fn test_pool_size_always_within_bounds(w in 0.0f32..10000.0, h in 0.0f32..10000.0) {
        let config = ParticleConfig::default();
        let n = pool_size(Viewport::new(w, h), &config);
        prop_assert!((40..=180).contains(&n));
    }

    #[test]
    fn test_positions_stay_within_wrap_margin(seed in any::<u64>(), steps in 1usize..60) {
        let config = ParticleConfig { seed: Some(seed), ..ParticleConfig::default() };
        let viewport = Viewport::new(800.0, 600.0);
        let mut field = ParticleField::new(config, viewport);
        field.mouse_move(400.0, 300.0);
        for _ in 0..steps {
            field.step();
        }
        let margin = field.config().wrap_margin;
        for p in field.particles() {
            prop_assert!(viewport.contains_with_margin(p.position, margin), "{:?}", p.position);
        }
    }
}

// ============================================================================
// Pointer interaction
// ============================================================================

#[test]
fn test_cursor_attracts_nearby_particle() {
    let mut field = ParticleField::new(seeded_config(), Viewport::new(1920.0, 1080.0));
    let cursor = Vec2::new(960.0, 540.0);
    for (i, p) in field.particles_mut().iter_mut().enumerate() {
        // Everything but the first particle sits well outside the mouse radius
        p.position = if i == 0 {
            Vec2::new(760.0, 540.0)
        } else {
            Vec2::new((i * 19 % 1900) as f32, 1050.0)
        };
        p.velocity = Vec2::ZERO;
    }

    field.mouse_move(cursor.x, cursor.y);
    for _ in 0..20 {
        field.step();
    }
    let p = &field.particles()[0];
    assert!(p.position.distance(&cursor) < 200.0);
    assert!(p.is_energized(0.0));
}

#[test]
fn test_particle_on_cursor_stays_finite() {
    let viewport = Viewport::new(1920.0, 1080.0);
    let collapsed = ParticleConfig {
        orbit_distance: 0.0,
        ..seeded_config()
    };
    assert!(collapsed.validate().is_err());

    let config = ParticleConfig {
        orbit_distance: 0.01,
        ..seeded_config()
    };
    config.validate().unwrap();
    let mut field = ParticleField::new(config, viewport);
    field.particles_mut()[0].position = Vec2::new(960.0, 540.0);
    field.mouse_move(960.0, 540.0);
    for _ in 0..3 {
        field.step();
    }
    let margin = field.config().wrap_margin;
    for p in field.particles() {
        assert!(p.position.x.is_finite() && p.position.y.is_finite());
        assert!(viewport.contains_with_margin(p.position, margin));
    }
}

#[test]
fn test_mouse_leave_returns_to_idle_drift() {
    let mut field = ParticleField::new(seeded_config(), Viewport::new(1920.0, 1080.0));
    field.mouse_move(100.0, 100.0);
    field.step();
    field.mouse_leave();
    assert!(field.mouse().position.is_none());

    let mut recorder = FrameRecorder::new();
    field.draw(&mut recorder);
    // No cursor glow once the pointer is gone
    assert_eq!(
        recorder.glows(),
        field
            .particles()
            .iter()
            .filter(|p| p.is_energized(field.config().glow_threshold))
            .count()
    );
}

// ============================================================================
// Themes and rendering
// ============================================================================

#[test]
fn test_theme_change_keeps_motion_state() {
    let mut field = ParticleField::new(seeded_config(), Viewport::new(1920.0, 1080.0));
    field.step();
    let positions: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();

    field.set_theme(Theme::Nord);
    let palette = Theme::Nord.palette();
    for (p, before) in field.particles().iter().zip(&positions) {
        assert_eq!(p.position, *before);
        assert!(palette.particles.contains(&p.color));
    }
}

#[test]
fn test_gruvbox_draws_squares_without_glow() {
    let config = ParticleConfig {
        theme: Theme::Gruvbox,
        ..seeded_config()
    };
    let field = ParticleField::new(config, Viewport::new(1920.0, 1080.0));
    let mut recorder = FrameRecorder::new();
    field.draw(&mut recorder);
    assert_eq!(recorder.squares(), field.particles().len());
    assert_eq!(recorder.circles(), 0);
    assert_eq!(recorder.glows(), 0);
}

#[test]
fn test_round_themes_draw_circles() {
    for theme in [Theme::Nord, Theme::Tokyo, Theme::Catppuccin, Theme::Material] {
        let config = ParticleConfig {
            theme,
            ..seeded_config()
        };
        let field = ParticleField::new(config, Viewport::new(1280.0, 720.0));
        let mut recorder = FrameRecorder::new();
        field.draw(&mut recorder);
        assert_eq!(recorder.circles(), field.particles().len(), "theme {}", theme);
        assert_eq!(recorder.squares(), 0);
    }
}

#[test]
fn test_reduced_motion_field_is_inert() {
    let config = ParticleConfig {
        reduced_motion: true,
        ..seeded_config()
    };
    let mut field = ParticleField::new(config, Viewport::new(1920.0, 1080.0));
    field.step();
    assert!(field.particles().is_empty());
    assert_eq!(field.frame(), 0);
}

#[test]
fn test_same_seed_same_frames() {
    let viewport = Viewport::new(1024.0, 768.0);
    let mut a = ParticleField::new(seeded_config(), viewport);
    let mut b = ParticleField::new(seeded_config(), viewport);
    a.mouse_move(300.0, 200.0);
    b.mouse_move(300.0, 200.0);
    for _ in 0..30 {
        a.step();
        b.step();
    }
    for (pa, pb) in a.particles().iter().zip(b.particles()) {
        assert_eq!(pa.position, pb.position);
    }
}
