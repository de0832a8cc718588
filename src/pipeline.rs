// THEORY:
// The `pipeline` module is the top-level API of the remap engine. A
// `RemapBuilder` holds two projections: the one the source image is stored in
// (input) and the one we want to draw (output). For every output pixel it asks
// the output projection for the ray through that pixel, then asks the input
// projection where that ray lands. The two resulting coordinates are written
// into a pair of float maps, the `RemapTable`.
//
// Key properties:
// 1.  **Pure per-pixel work**: each cell depends only on its own (x, y), so rows
//     are evaluated in parallel with rayon and no synchronization beyond the
//     final join. Parallel and sequential builds produce identical tables.
// 2.  **No clamping**: coordinates that fall outside the input image (seams,
//     poles) are passed through as computed. Wrapping and border handling
//     belong to the resampler.
// 3.  **Ownership**: the builder owns the maps while filling them and moves them
//     into the returned table. Nothing else can observe a half-built table.

use crate::core_modules::direction::SourceCoordinate;
use crate::core_modules::projection::Projection;
use image::{ImageBuffer, Luma};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

/// A single-channel float image holding one coordinate component per pixel.
pub type CoordinateMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// The x-map and y-map for one conversion, shaped like the output projection.
#[derive(Debug, Clone)]
pub struct RemapTable {
    map_x: CoordinateMap,
    map_y: CoordinateMap,
}

impl RemapTable {
    pub(crate) fn from_maps(map_x: CoordinateMap, map_y: CoordinateMap) -> Self {
        debug_assert_eq!(map_x.dimensions(), map_y.dimensions());
        Self { map_x, map_y }
    }

    pub fn width(&self) -> u32 {
        self.map_x.width()
    }

    pub fn height(&self) -> u32 {
        self.map_x.height()
    }

    /// The input coordinate stored for output pixel `(x, y)`.
    ///
    /// Panics if `(x, y)` is outside the table, like [`ImageBuffer::get_pixel`].
    pub fn coordinate(&self, x: u32, y: u32) -> SourceCoordinate {
        SourceCoordinate::new(
            f64::from(self.map_x.get_pixel(x, y).0[0]),
            f64::from(self.map_y.get_pixel(x, y).0[0]),
        )
    }

    pub fn map_x(&self) -> &CoordinateMap {
        &self.map_x
    }

    pub fn map_y(&self) -> &CoordinateMap {
        &self.map_y
    }

    pub fn into_maps(self) -> (CoordinateMap, CoordinateMap) {
        (self.map_x, self.map_y)
    }

    /// Number of NaN or infinite cells across both maps.
    pub fn non_finite_count(&self) -> usize {
        self.map_x
            .as_raw()
            .iter()
            .chain(self.map_y.as_raw().iter())
            .filter(|value| !value.is_finite())
            .count()
    }
}

/// Composes an input and an output projection into a remap table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemapBuilder {
    input: Projection,
    output: Projection,
    parallel: bool,
}

impl RemapBuilder {
    pub fn new(input: Projection, output: Projection) -> Self {
        Self {
            input,
            output,
            parallel: true,
        }
    }

    /// Evaluate rows on the rayon thread pool (the default) or on the calling thread.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn input(&self) -> &Projection {
        &self.input
    }

    pub fn output(&self) -> &Projection {
        &self.output
    }

    /// The input coordinate for a single output pixel.
    pub fn remap_pixel(&self, x: u32, y: u32) -> SourceCoordinate {
        let direction = self.output.pixel_to_direction(f64::from(x), f64::from(y));
        self.input.direction_to_pixel(direction)
    }

    /// Fills one output row of both maps.
    pub(crate) fn fill_row(&self, y: u32, row_x: &mut [f32], row_y: &mut [f32]) {
        for (x, (cell_x, cell_y)) in row_x.iter_mut().zip(row_y.iter_mut()).enumerate() {
            let coordinate = self.remap_pixel(x as u32, y);
            *cell_x = coordinate.u as f32;
            *cell_y = coordinate.v as f32;
        }
    }

    pub fn build_maps(&self) -> RemapTable {
        let width = self.output.width();
        let height = self.output.height();
        let started = Instant::now();
        debug!(width, height, parallel = self.parallel, "building remap table");

        let mut map_x = CoordinateMap::new(width, height);
        let mut map_y = CoordinateMap::new(width, height);
        {
            let cells_x: &mut [f32] = &mut map_x;
            let cells_y: &mut [f32] = &mut map_y;
            let row_len = width as usize;

            if self.parallel {
                cells_x
                    .par_chunks_mut(row_len)
                    .zip(cells_y.par_chunks_mut(row_len))
                    .enumerate()
                    .for_each(|(y, (row_x, row_y))| self.fill_row(y as u32, row_x, row_y));
            } else {
                cells_x
                    .chunks_mut(row_len)
                    .zip(cells_y.chunks_mut(row_len))
                    .enumerate()
                    .for_each(|(y, (row_x, row_y))| self.fill_row(y as u32, row_x, row_y));
            }
        }

        let table = RemapTable::from_maps(map_x, map_y);
        report_build(&table, started);
        table
    }
}

/// Logs the outcome of a finished build.
pub(crate) fn report_build(table: &RemapTable, started: Instant) {
    let non_finite = table.non_finite_count();
    if non_finite > 0 {
        warn!(non_finite, "remap table contains non-finite coordinates");
    }
    debug!(
        width = table.width(),
        height = table.height(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "remap table built"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::cubemap::CubemapLayout;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_remap_reproduces_pixel_positions() {
        let sphere = Projection::equirectangular(360, 180).unwrap();
        let table = RemapBuilder::new(sphere, sphere).build_maps();
        assert_eq!((table.width(), table.height()), (360, 180));

        // Row 0 is the north pole, where every column collapses onto one ray.
        for y in 1..180 {
            for x in 0..360 {
                let coordinate = table.coordinate(x, y);
                let du = (coordinate.u - f64::from(x)).rem_euclid(360.0);
                assert!(du.min(360.0 - du) < 1e-3, "x-map at ({x}, {y}) = {}", coordinate.u);
                assert_abs_diff_eq!(coordinate.v, f64::from(y), epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn sphere_to_strip_is_finite_and_shaped_like_the_output() {
        let sphere = Projection::equirectangular(360, 180).unwrap();
        let strip = Projection::cubemap(90, 0, CubemapLayout::Strip).unwrap();
        let table = RemapBuilder::new(sphere, strip).build_maps();

        assert_eq!(table.map_x().dimensions(), (540, 90));
        assert_eq!(table.map_y().dimensions(), (540, 90));
        assert_eq!(table.non_finite_count(), 0);
    }

    #[test]
    fn parallel_and_sequential_builds_match() {
        let sphere = Projection::equirectangular(128, 64).unwrap();
        let cross = Projection::cubemap(24, 2, CubemapLayout::Cross).unwrap();
        let builder = RemapBuilder::new(sphere, cross);

        let parallel = builder.build_maps();
        let sequential = builder.with_parallel(false).build_maps();
        assert_eq!(parallel.map_x().as_raw(), sequential.map_x().as_raw());
        assert_eq!(parallel.map_y().as_raw(), sequential.map_y().as_raw());
    }

    #[test]
    fn cells_hold_the_composed_mapping() {
        let strip = Projection::cubemap(32, 0, CubemapLayout::Strip).unwrap();
        let sphere = Projection::equirectangular(200, 100).unwrap();
        let builder = RemapBuilder::new(strip, sphere);
        let table = builder.build_maps();

        // The sphere's forward pixel samples the middle of the +X tile.
        let forward = table.coordinate(100, 50);
        assert_abs_diff_eq!(forward.u, 16.0, epsilon = 1e-4);
        assert_abs_diff_eq!(forward.v, 16.0, epsilon = 1e-4);

        for (x, y) in [(0, 0), (37, 12), (199, 99)] {
            let expected = builder.remap_pixel(x, y);
            let stored = table.coordinate(x, y);
            assert_abs_diff_eq!(stored.u, expected.u, epsilon = 1e-3);
            assert_abs_diff_eq!(stored.v, expected.v, epsilon = 1e-3);
        }
    }

    #[test]
    fn into_maps_hands_over_both_buffers() {
        let strip = Projection::cubemap(4, 0, CubemapLayout::Strip).unwrap();
        let (map_x, map_y) = RemapBuilder::new(strip, strip).build_maps().into_maps();
        assert_eq!(map_x.as_raw().len(), 24 * 4);
        assert_eq!(map_y.as_raw().len(), 24 * 4);
    }
}
