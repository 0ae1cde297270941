//! Scrollbar error types

use thiserror::Error;

/// Scrollbar-related errors
#[derive(Error, Debug)]
pub enum ScrollbarError {
    /// A geometry query needed the render surface before `attach` was called
    #[error("Scrollbar is not attached to a render surface")]
    NotAttached,

    /// The attached surface no longer reports a bounding rectangle
    #[error("Scrollbar surface has no layout (element detached?)")]
    Detached,

    /// Failed to read an options file
    #[error("Failed to read scrollbar options: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse scrollbar options
    #[error("Invalid scrollbar options: {0}")]
    Options(#[from] toml::de::Error),
}

/// Result type for scrollbar operations
pub type Result<T> = std::result::Result<T, ScrollbarError>;
