// THEORY:
// The equirectangular (spherical) projection maps azimuth linearly onto image
// columns and elevation linearly onto image rows.
//
// Axis convention:
// - +X is "forward" and sits at the image center (zero azimuth, zero elevation).
// - Azimuth grows to the right, turning from +X towards +Y.
// - +Z is "up". Row 0 is the north pole when the image is twice as wide as tall.
//
// One scale factor, `half_width / pi` pixels per radian, is shared by both axes,
// so a 2:1 image covers exactly the full sphere. The forward and inverse
// mappings below are exact inverses of each other away from the poles. At a
// pole the azimuth is undefined; we pin it to zero instead of letting `atan2`
// decide, which keeps every output finite.

use crate::core_modules::direction::{Direction, SourceCoordinate};
use crate::core_modules::numeric::{POLE_EPSILON, clamp_unit};
use crate::error::{ProjectorError, Result};
use std::f64::consts::PI;

/// An equirectangular image of fixed dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquirectangularProjection {
    half_width: f64,
    half_height: f64,
    /// Pixels per radian, along both axes.
    scale: f64,
}

impl EquirectangularProjection {
    pub fn new(image_width: u32, image_height: u32) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(ProjectorError::InvalidDimensions {
                width: image_width,
                height: image_height,
            });
        }
        let half_width = f64::from(image_width) / 2.0;
        let half_height = f64::from(image_height) / 2.0;
        Ok(Self {
            half_width,
            half_height,
            scale: half_width / PI,
        })
    }

    pub fn width(&self) -> u32 {
        (2.0 * self.half_width) as u32
    }

    pub fn height(&self) -> u32 {
        (2.0 * self.half_height) as u32
    }

    /// Pixels per radian.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pixel_to_direction(&self, u: f64, v: f64) -> Direction {
        let azimuth = (u - self.half_width) / self.scale;
        // Rows grow downwards, elevation grows upwards.
        let elevation = -(v - self.half_height) / self.scale;

        let (sin_elevation, cos_elevation) = elevation.sin_cos();
        let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
        Direction::new(
            cos_elevation * cos_azimuth,
            cos_elevation * sin_azimuth,
            sin_elevation,
        )
    }

    pub fn direction_to_pixel(&self, direction: Direction) -> SourceCoordinate {
        let direction = direction.normalized_or_forward();

        let horizontal = direction.x.hypot(direction.y);
        let azimuth = if horizontal < POLE_EPSILON {
            0.0
        } else {
            direction.y.atan2(direction.x)
        };
        let elevation = clamp_unit(direction.z).asin();

        SourceCoordinate::new(
            self.scale * azimuth + self.half_width,
            -self.scale * elevation + self.half_height,
        )
    }
}
