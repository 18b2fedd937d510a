//! Application configuration with documented constants
//!
//! Every tuning value used by the widgets lives here. Defaults reproduce the
//! feel of the live site; a TOML file can override any subset of them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{DotfolioError, Result};
use crate::keyboard::Platform;
use crate::particles::Theme;

/// Tuning for the particle field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    // === POOL SIZE ===
    /// Particle count at the reference viewport area
    ///
    /// Scaled linearly with viewport area, then clamped to
    /// `[min_particles, max_particles]`.
    pub particle_count: usize,
    /// Reference viewport width for `particle_count`
    pub reference_width: f32,
    /// Reference viewport height for `particle_count`
    pub reference_height: f32,
    pub min_particles: usize,
    /// Upper bound on the pool; pairwise repulsion is O(n²) per frame
    pub max_particles: usize,

    // === SPAWN ===
    pub min_size: f32,
    pub max_size: f32,
    /// Initial velocity spread per axis
    pub base_speed: f32,
    /// Base opacity is drawn from `[opacity_min, opacity_min + opacity_spread)`
    pub opacity_min: f32,
    pub opacity_spread: f32,

    // === MOUSE INTERACTION ===
    /// Radius within which the cursor influences particles
    pub mouse_radius: f32,
    /// Radius within which particles are linked to the cursor
    pub mouse_connection_radius: f32,
    pub attraction_strength: f32,
    /// Strength of the perpendicular swirl term
    pub orbit_strength: f32,
    /// Inside this distance the cursor repels instead of attracting
    pub orbit_distance: f32,
    pub orbit_repel_strength: f32,
    /// Cursor speed to jitter factor; the factor saturates at 1.0
    pub speed_influence: f32,
    pub jitter_strength: f32,
    /// Extra size at the cursor position
    pub grow_size: f32,
    /// Extra opacity at the cursor position
    pub grow_opacity: f32,
    /// Fraction of the remaining gap to base size/opacity closed per frame
    pub ease_rate: f32,
    pub mouse_damping: f32,

    // === IDLE ===
    pub idle_drift: f32,
    pub idle_damping: f32,

    // === FIELD ===
    /// Distance past the edge at which particles wrap around
    pub wrap_margin: f32,
    pub repel_distance: f32,
    pub repel_strength: f32,
    /// Maximum distance for particle-to-particle links
    pub link_distance: f32,
    pub mouse_link_alpha: f32,
    pub pair_link_alpha: f32,
    /// Opacity above base at which a particle counts as energized
    pub glow_threshold: f32,
    /// Cursor glow radius as a fraction of `mouse_radius`
    pub mouse_glow_scale: f32,

    // === PRESENTATION ===
    pub theme: Theme,
    /// Disables the field entirely (prefers-reduced-motion)
    pub reduced_motion: bool,
    /// RNG seed; random when unset
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            reference_width: 1920.0,
            reference_height: 1080.0,
            min_particles: 40,
            max_particles: 180,

            min_size: 1.0,
            max_size: 4.0,
            base_speed: 0.15,
            opacity_min: 0.35,
            opacity_spread: 0.3,

            mouse_radius: 250.0,
            mouse_connection_radius: 200.0,
            attraction_strength: 0.08,
            orbit_strength: 0.03,
            orbit_distance: 70.0,
            orbit_repel_strength: 0.2,
            speed_influence: 0.01,
            jitter_strength: 0.5,
            grow_size: 3.0,
            grow_opacity: 0.7,
            ease_rate: 0.05,
            mouse_damping: 0.98,

            idle_drift: 0.01,
            idle_damping: 0.99,

            wrap_margin: 50.0,
            repel_distance: 30.0,
            repel_strength: 0.15,
            link_distance: 100.0,
            mouse_link_alpha: 0.4,
            pair_link_alpha: 0.2,
            glow_threshold: 0.2,
            mouse_glow_scale: 0.6,

            theme: Theme::default(),
            reduced_motion: false,
            seed: None,
        }
    }
}

impl ParticleConfig {
    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_particles > self.max_particles {
            return Err(DotfolioError::Config(format!(
                "min_particles ({}) should be <= max_particles ({})",
                self.min_particles, self.max_particles
            )));
        }
        if self.min_size > self.max_size {
            return Err(DotfolioError::Config(format!(
                "min_size ({}) should be <= max_size ({})",
                self.min_size, self.max_size
            )));
        }
        for (name, value) in [
            ("mouse_radius", self.mouse_radius),
            ("mouse_connection_radius", self.mouse_connection_radius),
            ("orbit_distance", self.orbit_distance),
            ("link_distance", self.link_distance),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(DotfolioError::Config(format!(
                    "{} ({}) must be > 0",
                    name, value
                )));
            }
        }
        if self.repel_distance.is_nan() || self.repel_distance < 0.0 {
            return Err(DotfolioError::Config(format!(
                "repel_distance ({}) must be >= 0",
                self.repel_distance
            )));
        }
        if self.orbit_distance >= self.mouse_radius {
            return Err(DotfolioError::Config(format!(
                "orbit_distance ({}) should be < mouse_radius ({})",
                self.orbit_distance, self.mouse_radius
            )));
        }
        if self.reference_width <= 0.0 || self.reference_height <= 0.0 {
            return Err(DotfolioError::Config(
                "reference viewport must have a positive area".into(),
            ));
        }
        if self.wrap_margin < 0.0 {
            return Err(DotfolioError::Config("wrap_margin must be >= 0".into()));
        }
        Ok(())
    }
}

/// Tuning and script for the terminal simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Canned commands typed on start, in order
    pub commands: Vec<String>,
    pub prompt: String,
    /// Delay before the first command starts
    pub start_delay_ms: u64,
    /// Per-character delay is drawn from `[char_delay_min_ms, char_delay_max_ms)`
    pub char_delay_min_ms: u64,
    pub char_delay_max_ms: u64,
    /// Pause after a command finishes before the next begins
    pub command_pause_ms: u64,
    /// Delay between the last command and the input line appearing
    pub input_reveal_ms: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            commands: vec![
                "neofetch".into(),
                "cat ~/.config/hyprland/hyprland.conf | head -5".into(),
                "skhd --version".into(),
                "yabai --version".into(),
                "echo \"Welcome to my portfolio!\"".into(),
            ],
            prompt: "$".into(),
            start_delay_ms: 300,
            char_delay_min_ms: 20,
            char_delay_max_ms: 60,
            command_pause_ms: 200,
            input_reveal_ms: 300,
        }
    }
}

impl TerminalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.char_delay_min_ms >= self.char_delay_max_ms {
            return Err(DotfolioError::Config(format!(
                "char_delay_min_ms ({}) should be < char_delay_max_ms ({})",
                self.char_delay_min_ms, self.char_delay_max_ms
            )));
        }
        Ok(())
    }
}

/// Keybind backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Origin serving `/api/keybinds/{platform}`
    pub base_url: String,
    /// Platform used when the query string names none
    pub default_platform: Platform,
    pub request_timeout_secs: u64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            default_platform: Platform::Yabai,
            request_timeout_secs: 10,
        }
    }
}

impl KeyboardConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DotfolioError::Config(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub particles: ParticleConfig,
    pub terminal: TerminalConfig,
    pub keyboard: KeyboardConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.particles.validate()?;
        self.terminal.validate()?;
        self.keyboard.validate()?;
        Ok(())
    }
}
