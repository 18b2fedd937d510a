pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{DotfolioError, Result};
pub use types::{Rgb, Vec2, Viewport};
