// THEORY:
// `Projection` is the closed set of image layouts the remap engine understands.
// The set is small and fixed, so it is an enum rather than a trait object: the
// builder matches on it exhaustively and adding a variant is a compile error
// everywhere it has to be handled.
//
// Each variant answers the same three questions: how big is the image, which
// ray passes through a given pixel, and which pixel a given ray lands on.

use crate::core_modules::cubemap::{CubemapLayout, CubemapProjection};
use crate::core_modules::direction::{Direction, SourceCoordinate};
use crate::core_modules::equirectangular::EquirectangularProjection;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Equirectangular(EquirectangularProjection),
    Cubemap(CubemapProjection),
}

impl Projection {
    pub fn equirectangular(image_width: u32, image_height: u32) -> Result<Self> {
        EquirectangularProjection::new(image_width, image_height).map(Projection::Equirectangular)
    }

    pub fn cubemap(side_length: u32, border_padding: u32, layout: CubemapLayout) -> Result<Self> {
        CubemapProjection::new(side_length, border_padding, layout).map(Projection::Cubemap)
    }

    pub fn width(&self) -> u32 {
        match self {
            Projection::Equirectangular(projection) => projection.width(),
            Projection::Cubemap(projection) => projection.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Projection::Equirectangular(projection) => projection.height(),
            Projection::Cubemap(projection) => projection.height(),
        }
    }

    /// The unit ray through pixel `(u, v)`.
    pub fn pixel_to_direction(&self, u: f64, v: f64) -> Direction {
        match self {
            Projection::Equirectangular(projection) => projection.pixel_to_direction(u, v),
            Projection::Cubemap(projection) => projection.pixel_to_direction(u, v),
        }
    }

    /// The pixel a ray lands on. Only the orientation of `direction` matters.
    pub fn direction_to_pixel(&self, direction: Direction) -> SourceCoordinate {
        match self {
            Projection::Equirectangular(projection) => projection.direction_to_pixel(direction),
            Projection::Cubemap(projection) => projection.direction_to_pixel(direction),
        }
    }
}

impl From<EquirectangularProjection> for Projection {
    fn from(projection: EquirectangularProjection) -> Self {
        Projection::Equirectangular(projection)
    }
}

impl From<CubemapProjection> for Projection {
    fn from(projection: CubemapProjection) -> Self {
        Projection::Cubemap(projection)
    }
}
