use crate::config::ConfigError;
use crate::template_matching::Rect;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for screen perception.
pub type PerceptionResult<T> = Result<T, PerceptionError>;

/// The error type for reading the game screen.
#[derive(Debug, Error)]
pub enum PerceptionError {
    #[error("Template image {path:?} is missing")]
    MissingTemplate { path: PathBuf },

    #[error("Failed to load template image {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Invalid window size '{size}', expected 2560x1440, 1920x1080 or 1600x900")]
    UnsupportedWindowSize { size: String },

    #[error("Screen capture failed: {description}")]
    Capture { description: String },

    #[error("Region {region:?} is outside the {width}x{height} screen")]
    RegionOutOfBounds { region: Rect, width: u32, height: u32 },

    #[error("Pixel ({x},{y}) is outside the screen")]
    PixelOutOfBounds { x: i32, y: i32 },

    #[error("Asset directory {path:?} cannot be read: {source}")]
    AssetDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Setting(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
