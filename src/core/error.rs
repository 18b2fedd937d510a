use thiserror::Error;

#[derive(Error, Debug)]
pub enum DotfolioError {
    #[error("Keybind request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Keybind endpoint {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed keybind payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid keybind at index {index}: {reason}")]
    InvalidKeybind { index: usize, reason: String },

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DotfolioError>;
