//! Keybind schema as served by `/api/keybinds/{platform}`

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::{DotfolioError, Result};

/// Named keybinding profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Hyprland,
    #[default]
    Yabai,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Hyprland => "hyprland",
            Platform::Yabai => "yabai",
        }
    }

    /// The other platform, for toggling
    pub fn next(&self) -> Platform {
        match self {
            Platform::Hyprland => Platform::Yabai,
            Platform::Yabai => Platform::Hyprland,
        }
    }

    /// Path of the keybind endpoint for this platform
    pub fn endpoint_path(&self) -> String {
        format!("/api/keybinds/{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DotfolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hyprland" => Ok(Platform::Hyprland),
            "yabai" => Ok(Platform::Yabai),
            _ => Err(DotfolioError::UnknownPlatform(s.to_string())),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key plus modifiers mapped to a described action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybind {
    pub category: String,
    pub key: String,
    pub modifiers: Vec<String>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Shell command bound to the key, when the config has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Keybind {
    pub fn new(category: &str, key: &str, modifiers: &[&str], action: &str) -> Self {
        Self {
            category: category.to_string(),
            key: key.to_string(),
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            action: action.to_string(),
            platform: None,
            command: None,
        }
    }

    /// Human-readable chord, e.g. `Alt + Shift + H`
    pub fn format(&self) -> String {
        let key = self.key.to_uppercase();
        if self.modifiers.is_empty() {
            return key;
        }
        let mods: Vec<String> = self.modifiers.iter().map(|m| capitalize(m)).collect();
        format!("{} + {}", mods.join(" + "), key)
    }

    /// Lowercased key and modifiers this bind touches
    pub fn referenced_keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.key.to_lowercase())
            .chain(self.modifiers.iter().map(|m| m.to_lowercase()))
    }

    fn validate(&self, index: usize) -> Result<()> {
        let invalid = |reason: &str| DotfolioError::InvalidKeybind {
            index,
            reason: reason.to_string(),
        };
        if self.key.trim().is_empty() {
            return Err(invalid("empty key"));
        }
        if self.category.trim().is_empty() {
            return Err(invalid("empty category"));
        }
        if self.modifiers.iter().any(|m| m.trim().is_empty()) {
            return Err(invalid("empty modifier"));
        }
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Decode and validate a keybind list response body
pub fn parse_keybinds(body: &str) -> Result<Vec<Keybind>> {
    let keybinds: Vec<Keybind> = serde_json::from_str(body)?;
    for (index, kb) in keybinds.iter().enumerate() {
        kb.validate(index)?;
    }
    Ok(keybinds)
}
