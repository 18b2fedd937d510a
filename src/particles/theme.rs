//! Color themes for the particle field

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::DotfolioError;
use crate::core::types::Rgb;

/// Site-wide visual theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Nord,
    #[default]
    Tokyo,
    Catppuccin,
    Gruvbox,
    Material,
}

/// Colors used by the field under one theme
#[derive(Debug, Clone, Copy)]
pub struct ThemePalette {
    pub particles: [Rgb; 4],
    pub mouse_connection: Rgb,
    pub particle_connection: Rgb,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Nord,
        Theme::Tokyo,
        Theme::Catppuccin,
        Theme::Gruvbox,
        Theme::Material,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Nord => "nord",
            Theme::Tokyo => "tokyo",
            Theme::Catppuccin => "catppuccin",
            Theme::Gruvbox => "gruvbox",
            Theme::Material => "material",
        }
    }

    /// Next theme in cycle order
    pub fn next(&self) -> Theme {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Gruvbox draws flat squares and no glow
    pub fn square_particles(&self) -> bool {
        matches!(self, Theme::Gruvbox)
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            Theme::Nord => ThemePalette {
                particles: [
                    Rgb::new(0x8f, 0xbc, 0xbb),
                    Rgb::new(0x88, 0xc0, 0xd0),
                    Rgb::new(0x81, 0xa1, 0xc1),
                    Rgb::new(0x5e, 0x81, 0xac),
                ],
                mouse_connection: Rgb::new(136, 192, 208),
                particle_connection: Rgb::new(180, 142, 173),
            },
            Theme::Tokyo => ThemePalette {
                particles: [
                    Rgb::new(0x7a, 0xa2, 0xf7),
                    Rgb::new(0xbb, 0x9a, 0xf7),
                    Rgb::new(0x5d, 0x7c, 0xbf),
                    Rgb::new(0x89, 0xb4, 0xfa),
                ],
                mouse_connection: Rgb::new(122, 162, 247),
                particle_connection: Rgb::new(187, 154, 247),
            },
            Theme::Catppuccin => ThemePalette {
                particles: [
                    Rgb::new(0xcb, 0xa6, 0xf7),
                    Rgb::new(0x89, 0xb4, 0xfa),
                    Rgb::new(0x94, 0xe2, 0xd5),
                    Rgb::new(0xf5, 0xc2, 0xe7),
                ],
                mouse_connection: Rgb::new(203, 166, 247),
                particle_connection: Rgb::new(245, 194, 231),
            },
            Theme::Gruvbox => ThemePalette {
                particles: [
                    Rgb::new(0xfe, 0x80, 0x19),
                    Rgb::new(0xfa, 0xbd, 0x2f),
                    Rgb::new(0xb8, 0xbb, 0x26),
                    Rgb::new(0x83, 0xa5, 0x98),
                ],
                mouse_connection: Rgb::new(254, 128, 25),
                particle_connection: Rgb::new(211, 134, 155),
            },
            Theme::Material => ThemePalette {
                particles: [
                    Rgb::new(0x82, 0xaa, 0xff),
                    Rgb::new(0xc7, 0x92, 0xea),
                    Rgb::new(0x89, 0xdd, 0xff),
                    Rgb::new(0xc3, 0xe8, 0x8d),
                ],
                mouse_connection: Rgb::new(130, 170, 255),
                particle_connection: Rgb::new(199, 146, 234),
            },
        }
    }
}

impl FromStr for Theme {
    type Err = DotfolioError;

    /// Unknown names are an error; callers wanting the site's
    /// fallback use `Theme::default()`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DotfolioError::UnknownTheme(s.to_string()))
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_tokyo() {
        assert_eq!(Theme::default(), Theme::Tokyo);
    }

    #[test]
    fn test_cycle_visits_every_theme() {
        let mut theme = Theme::Nord;
        let mut seen = Vec::new();
        for _ in 0..Theme::ALL.len() {
            seen.push(theme);
            theme = theme.next();
        }
        assert_eq!(theme, Theme::Nord);
        assert_eq!(seen, Theme::ALL.to_vec());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Gruvbox".parse::<Theme>().unwrap(), Theme::Gruvbox);
        assert!("solarized".parse::<Theme>().is_err());
    }

    #[test]
    fn test_only_gruvbox_is_square() {
        for theme in Theme::ALL {
            assert_eq!(theme.square_particles(), theme == Theme::Gruvbox);
        }
    }
}
