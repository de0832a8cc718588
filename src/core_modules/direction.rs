// THEORY:
// The two value types that flow between projections.
//
// A `Direction` is a viewing ray from the optical center of a panorama. Every
// pixel->direction mapping produces a unit-length `Direction`; every
// direction->pixel mapping only cares about its orientation. A
// `SourceCoordinate` is the answer to "where in the input image should this
// output pixel sample from". Both are plain `Copy` data created per pixel and
// dropped immediately, so they carry no invariants beyond their fields.

use crate::core_modules::numeric::DEGENERATE_LENGTH_EPSILON;

/// A 3D ray on (or, for callers that rescale it, through) the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Direction {
    /// The ray through the center of an equirectangular image.
    pub const FORWARD: Direction = Direction { x: 1.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns the same ray rescaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Unit-length copy of this ray.
    ///
    /// A vector too short to have an orientation falls back to [`Direction::FORWARD`]
    /// so that downstream trigonometry never sees a zero vector.
    pub fn normalized_or_forward(&self) -> Self {
        let length = self.length();
        if !length.is_finite() || length < DEGENERATE_LENGTH_EPSILON {
            return Self::FORWARD;
        }
        self.scaled(1.0 / length)
    }

    /// Component-wise distance, useful when comparing two rays.
    pub fn distance(&self, other: &Direction) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A location in a projection's pixel grid. Not necessarily integral and not
/// necessarily inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SourceCoordinate {
    pub u: f64,
    pub v: f64,
}

impl SourceCoordinate {
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    pub fn is_finite(&self) -> bool {
        self.u.is_finite() && self.v.is_finite()
    }
}
