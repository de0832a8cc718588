// THEORY:
// A cubemap stores the sphere as six square faces, one per signed axis, packed
// into a single image according to a layout.
//
// Two layouts are supported:
//
//   Strip (6 x 1)                         Cross (4 x 3)
//    ---- ---- ---- ---- ---- ----              ----
//   | +x | -x | +y | -y | +z | -z |            | +z |
//    ---- ---- ---- ---- ---- ----         ---- ---- ---- ----
//                                         | -x | -y | +x | +y |
//                                          ---- ---- ---- ----
//                                              | -z |
//                                               ----
//
// Every face owns a fixed mapping from its local square `(a, b)` in [-1, 1]^2
// (a grows rightwards, b grows downwards) to a point on the plane where its
// axis component is +-1. The same mapping is used by both layouts, and it was
// chosen so that neighbouring tiles of the cross share their edges.
//
// Border padding shrinks the usable part of every tile: `padding` pixels on
// each side are reserved for the resampler to interpolate across seams. Both
// mappings honour it, so pixel -> direction -> pixel is an identity inside the
// usable area. Pixels inside the padding map to directions slightly past the
// face edge.
//
// A ray exactly on a face's right or bottom edge (a or b = +1) maps to
// `origin + side`, which is the first pixel of the next tile in the image.
// `face_rect` describes the half-open tile `[origin, origin + side)`, so such
// coordinates sit on the seam rather than inside the face that produced them.

use crate::core_modules::direction::{Direction, SourceCoordinate};
use crate::error::{ProjectorError, Result};
use serde::{Deserialize, Serialize};

/// One of the six axis-aligned cube faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn index(self) -> usize {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }

    /// The unit vector through the center of this face.
    pub fn axis(self) -> Direction {
        self.local_to_vector(0.0, 0.0)
    }

    /// Picks the face a ray passes through.
    ///
    /// Ties between equal-magnitude components go to the first axis in X, Y, Z order.
    pub fn from_direction(direction: Direction) -> CubeFace {
        let abs_x = direction.x.abs();
        let abs_y = direction.y.abs();
        let abs_z = direction.z.abs();

        if abs_x >= abs_y && abs_x >= abs_z {
            if direction.x > 0.0 { CubeFace::PositiveX } else { CubeFace::NegativeX }
        } else if abs_y >= abs_x && abs_y >= abs_z {
            if direction.y > 0.0 { CubeFace::PositiveY } else { CubeFace::NegativeY }
        } else if direction.z > 0.0 {
            CubeFace::PositiveZ
        } else {
            CubeFace::NegativeZ
        }
    }

    /// Maps face-local `(a, b)` onto the face plane. The result is not normalized.
    fn local_to_vector(self, a: f64, b: f64) -> Direction {
        match self {
            CubeFace::PositiveX => Direction::new(1.0, a, -b),
            CubeFace::NegativeX => Direction::new(-1.0, -a, -b),
            CubeFace::PositiveY => Direction::new(-a, 1.0, -b),
            CubeFace::NegativeY => Direction::new(a, -1.0, -b),
            CubeFace::PositiveZ => Direction::new(a, -b, 1.0),
            CubeFace::NegativeZ => Direction::new(a, b, -1.0),
        }
    }

    /// Inverse of `local_to_vector` for a ray whose dominant axis is this face's.
    fn vector_to_local(self, direction: Direction) -> (f64, f64) {
        let (a, b, major) = match self {
            CubeFace::PositiveX => (direction.y, -direction.z, direction.x),
            CubeFace::NegativeX => (-direction.y, -direction.z, direction.x),
            CubeFace::PositiveY => (-direction.x, -direction.z, direction.y),
            CubeFace::NegativeY => (direction.x, -direction.z, direction.y),
            CubeFace::PositiveZ => (direction.x, -direction.y, direction.z),
            CubeFace::NegativeZ => (direction.x, direction.y, direction.z),
        };
        let major = major.abs();
        (a / major, b / major)
    }
}

const STRIP_ORDER: [CubeFace; 6] = CubeFace::ALL;

const CROSS_EQUATOR: [CubeFace; 4] = [
    CubeFace::NegativeX,
    CubeFace::NegativeY,
    CubeFace::PositiveX,
    CubeFace::PositiveY,
];

/// The column of the cross holding the +Z and -Z tiles.
const CROSS_SPINE_COLUMN: u32 = 1;

/// How the six faces are arranged inside one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubemapLayout {
    /// Six tiles in a single row.
    #[default]
    Strip,
    /// Four tiles around the equator with the poles above and below the second.
    Cross,
}

impl CubemapLayout {
    /// The tile grid as `(columns, rows)`.
    pub fn grid(self) -> (u32, u32) {
        match self {
            CubemapLayout::Strip => (6, 1),
            CubemapLayout::Cross => (4, 3),
        }
    }

    /// The `(column, row)` of the tile holding `face`.
    pub fn tile_of(self, face: CubeFace) -> (u32, u32) {
        match self {
            CubemapLayout::Strip => (face.index() as u32, 0),
            CubemapLayout::Cross => match face {
                CubeFace::NegativeX => (0, 1),
                CubeFace::NegativeY => (1, 1),
                CubeFace::PositiveX => (2, 1),
                CubeFace::PositiveY => (3, 1),
                CubeFace::PositiveZ => (CROSS_SPINE_COLUMN, 0),
                CubeFace::NegativeZ => (CROSS_SPINE_COLUMN, 2),
            },
        }
    }

    /// The face stored in a tile, or `None` for the unused tiles of the cross.
    pub fn face_at(self, column: u32, row: u32) -> Option<CubeFace> {
        match self {
            CubemapLayout::Strip if row == 0 => STRIP_ORDER.get(column as usize).copied(),
            CubemapLayout::Strip => None,
            CubemapLayout::Cross => match (column, row) {
                (CROSS_SPINE_COLUMN, 0) => Some(CubeFace::PositiveZ),
                (CROSS_SPINE_COLUMN, 2) => Some(CubeFace::NegativeZ),
                (column, 1) => CROSS_EQUATOR.get(column as usize).copied(),
                _ => None,
            },
        }
    }

    /// Like `face_at`, but an unused tile resolves to the face in the same column.
    fn nearest_face(self, column: u32, row: u32) -> CubeFace {
        if let Some(face) = self.face_at(column, row) {
            return face;
        }
        match self {
            CubemapLayout::Strip => STRIP_ORDER[(column as usize).min(STRIP_ORDER.len() - 1)],
            CubemapLayout::Cross => CROSS_EQUATOR[(column as usize).min(CROSS_EQUATOR.len() - 1)],
        }
    }
}

/// A cubemap image with square faces of `side_length` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubemapProjection {
    side_length: f64,
    border_padding: f64,
    layout: CubemapLayout,
}

impl CubemapProjection {
    pub fn new(side_length: u32, border_padding: u32, layout: CubemapLayout) -> Result<Self> {
        if side_length == 0 {
            return Err(ProjectorError::ZeroSideLength);
        }
        if 2 * u64::from(border_padding) >= u64::from(side_length) {
            return Err(ProjectorError::PaddingTooLarge {
                side_length,
                border_padding,
            });
        }
        let (columns, rows) = layout.grid();
        if columns.checked_mul(side_length).is_none() || rows.checked_mul(side_length).is_none() {
            return Err(ProjectorError::CubemapTooLarge {
                side_length,
                layout,
            });
        }
        Ok(Self {
            side_length: f64::from(side_length),
            border_padding: f64::from(border_padding),
            layout,
        })
    }

    pub fn width(&self) -> u32 {
        self.layout.grid().0 * self.side_length as u32
    }

    pub fn height(&self) -> u32 {
        self.layout.grid().1 * self.side_length as u32
    }

    pub fn side_length(&self) -> u32 {
        self.side_length as u32
    }

    pub fn border_padding(&self) -> u32 {
        self.border_padding as u32
    }

    pub fn layout(&self) -> CubemapLayout {
        self.layout
    }

    /// The pixel rectangle `(x, y, side)` of a face tile.
    pub fn face_rect(&self, face: CubeFace) -> (u32, u32, u32) {
        let side = self.side_length();
        let (column, row) = self.layout.tile_of(face);
        (column * side, row * side, side)
    }

    /// Width in pixels of the part of a tile that maps onto [-1, 1].
    fn usable_side(&self) -> f64 {
        self.side_length - 2.0 * self.border_padding
    }

    /// Index of the tile containing `position`, clamped into the grid.
    fn tile_index(&self, position: f64, count: u32) -> u32 {
        let index = (position / self.side_length).floor();
        if index >= 0.0 {
            (index as u32).min(count - 1)
        } else {
            0
        }
    }

    pub fn pixel_to_direction(&self, u: f64, v: f64) -> Direction {
        let (columns, rows) = self.layout.grid();
        let face = self
            .layout
            .nearest_face(self.tile_index(u, columns), self.tile_index(v, rows));

        // Local coordinates are measured from the face's own tile, so a pixel
        // from an unused tile extends that face's plane past its edge.
        let (origin_x, origin_y, _) = self.face_rect(face);
        let usable = self.usable_side();
        let a = 2.0 * (u - f64::from(origin_x) - self.border_padding) / usable - 1.0;
        let b = 2.0 * (v - f64::from(origin_y) - self.border_padding) / usable - 1.0;

        face.local_to_vector(a, b).normalized_or_forward()
    }

    pub fn direction_to_pixel(&self, direction: Direction) -> SourceCoordinate {
        let direction = direction.normalized_or_forward();
        let face = CubeFace::from_direction(direction);
        let (a, b) = face.vector_to_local(direction);

        // [-1, 1] -> [0, 1]
        let s = 0.5 * (a + 1.0);
        let t = 0.5 * (b + 1.0);

        let (origin_x, origin_y, _) = self.face_rect(face);
        let usable = self.usable_side();
        SourceCoordinate::new(
            f64::from(origin_x) + self.border_padding + s * usable,
            f64::from(origin_y) + self.border_padding + t * usable,
        )
    }
}
