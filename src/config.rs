// THEORY:
// A conversion is fully described by two projection configurations and a
// couple of build switches. This module is the serializable form of that
// description, so a conversion can live in a TOML file next to the images it
// applies to:
//
//     parallel = true
//
//     [input]
//     kind = "equirectangular"
//     width = 4096
//
//     [output]
//     kind = "cubemap"
//     side_length = 1024
//     border_padding = 2
//     layout = "cross"
//
// Configurations are plain data. Validation happens in `build()`, which goes
// through the projection constructors and reports a `ProjectorError`.

use crate::core_modules::cubemap::CubemapLayout;
use crate::core_modules::projection::Projection;
use crate::error::{ProjectorError, Result};
use crate::pipeline::RemapBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// The projection families, without their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    Equirectangular,
    Cubemap,
}

/// Constructor parameters for one projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionConfig {
    Equirectangular {
        width: u32,
        /// Defaults to half the width, which covers the full sphere.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Cubemap {
        side_length: u32,
        #[serde(default)]
        border_padding: u32,
        #[serde(default)]
        layout: CubemapLayout,
    },
}

impl ProjectionConfig {
    /// Derives a projection from the width of its image alone.
    ///
    /// An equirectangular image is assumed to be 2:1; a cubemap's side length
    /// is the width divided by the number of tile columns in its layout.
    pub fn for_image_width(
        kind: ProjectionKind,
        width: u32,
        border_padding: u32,
        layout: CubemapLayout,
    ) -> Self {
        match kind {
            ProjectionKind::Equirectangular => ProjectionConfig::Equirectangular {
                width,
                height: None,
            },
            ProjectionKind::Cubemap => ProjectionConfig::Cubemap {
                side_length: width / layout.grid().0,
                border_padding,
                layout,
            },
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        match self {
            ProjectionConfig::Equirectangular { .. } => ProjectionKind::Equirectangular,
            ProjectionConfig::Cubemap { .. } => ProjectionKind::Cubemap,
        }
    }

    pub fn build(&self) -> Result<Projection> {
        match *self {
            ProjectionConfig::Equirectangular { width, height } => {
                Projection::equirectangular(width, height.unwrap_or(width / 2))
            }
            ProjectionConfig::Cubemap {
                side_length,
                border_padding,
                layout,
            } => Projection::cubemap(side_length, border_padding, layout),
        }
    }
}

fn default_parallel() -> bool {
    true
}

/// A complete conversion: where the pixels come from and where they go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub input: ProjectionConfig,
    pub output: ProjectionConfig,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl ConversionConfig {
    pub fn new(input: ProjectionConfig, output: ProjectionConfig) -> Self {
        Self {
            input,
            output,
            parallel: default_parallel(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ProjectorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!(
            path = %path.display(),
            input = ?config.input.kind(),
            output = ?config.output.kind(),
            "loaded conversion config"
        );
        Ok(config)
    }

    pub fn builder(&self) -> Result<RemapBuilder> {
        let input = self.input.build()?;
        let output = self.output.build()?;
        Ok(RemapBuilder::new(input, output).with_parallel(self.parallel))
    }
}
