//! Error types for projector.
//!
//! Geometry never fails once a projection exists; everything here is raised
//! while validating configuration or while joining worker tasks.

use crate::core_modules::cubemap::CubemapLayout;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ProjectorError`].
pub type Result<T> = std::result::Result<T, ProjectorError>;

#[derive(Error, Debug)]
pub enum ProjectorError {
    /// An equirectangular image with a zero dimension.
    #[error("invalid equirectangular dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("cubemap side length must be positive")]
    ZeroSideLength,

    /// Padding on both edges must leave at least one usable pixel.
    #[error("border padding of {border_padding}px leaves no usable area on a {side_length}px face")]
    PaddingTooLarge { side_length: u32, border_padding: u32 },

    /// The layout's tile grid does not fit in a `u32` image dimension.
    #[error("a {layout:?} cubemap with {side_length}px faces is too large")]
    CubemapTooLarge { side_length: u32, layout: CubemapLayout },

    #[error("failed to read configuration from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A blocking remap worker panicked or was cancelled.
    #[error("remap worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
