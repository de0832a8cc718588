// THEORY:
// This file is the main entry point for the `projector` library crate.
//
// The crate converts 360 images between an equirectangular layout and cubemap
// layouts. It never touches pixel data: it answers, for every pixel of an
// output projection, which coordinate of the input projection it should be
// sampled from. The resulting pair of coordinate maps is handed to an external
// resampler (bilinear, bicubic, Lanczos, ...) that does the actual redraw.
//
// Layers, bottom up:
// - `core_modules`: value types and the projection geometry.
// - `pipeline`: `RemapBuilder`, which composes two projections into a `RemapTable`.
// - `parallel_pipeline`: the same build split into bands on a tokio runtime.
// - `config`: serde/TOML description of a conversion.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use crate::core_modules::cubemap::{CubeFace, CubemapLayout, CubemapProjection};
pub use crate::core_modules::direction::{Direction, SourceCoordinate};
pub use crate::core_modules::equirectangular::EquirectangularProjection;
pub use crate::core_modules::projection::Projection;
pub use crate::error::{ProjectorError, Result};
pub use crate::parallel_pipeline::BandedRemapBuilder;
pub use crate::pipeline::{CoordinateMap, RemapBuilder, RemapTable};
