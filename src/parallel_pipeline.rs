// THEORY:
// `BandedRemapBuilder` runs the same per-pixel work as `RemapBuilder`, but for
// callers that already live on a tokio runtime and must not block it.
//
// The output image is cut into horizontal bands, one per CPU by default. Each
// band is computed on tokio's blocking pool into its own buffers, so workers
// never share memory. When every band has finished, the bands are copied into
// the final maps in row order. The result is bit-for-bit the table that
// `RemapBuilder::build_maps` would produce.

use crate::error::Result;
use crate::pipeline::{CoordinateMap, RemapBuilder, RemapTable, report_build};
use futures::future::try_join_all;
use std::time::Instant;
use tracing::debug;

/// The rows `[start, end)` of both maps, computed by one worker.
struct Band {
    start: u32,
    cells_x: Vec<f32>,
    cells_y: Vec<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct BandedRemapBuilder {
    builder: RemapBuilder,
    band_count: usize,
}

impl BandedRemapBuilder {
    pub fn new(builder: RemapBuilder) -> Self {
        Self {
            builder,
            band_count: num_cpus::get().max(1),
        }
    }

    pub fn with_band_count(mut self, band_count: usize) -> Self {
        self.band_count = band_count.max(1);
        self
    }

    pub fn band_count(&self) -> usize {
        self.band_count
    }

    pub async fn build_maps(&self) -> Result<RemapTable> {
        let width = self.builder.output().width();
        let height = self.builder.output().height();
        let row_len = width as usize;
        let band_rows = (height as usize).div_ceil(self.band_count).max(1);
        let started = Instant::now();
        debug!(width, height, band_rows, "building remap table in bands");

        let workers = (0..height).step_by(band_rows).map(|start| {
            // band_rows is either 1 or at most height, so it fits in u32.
            let end = start.saturating_add(band_rows as u32).min(height);
            let builder = self.builder;
            tokio::task::spawn_blocking(move || {
                let cells = (end - start) as usize * row_len;
                let mut cells_x = vec![0.0f32; cells];
                let mut cells_y = vec![0.0f32; cells];
                for (offset, (row_x, row_y)) in cells_x
                    .chunks_mut(row_len)
                    .zip(cells_y.chunks_mut(row_len))
                    .enumerate()
                {
                    builder.fill_row(start + offset as u32, row_x, row_y);
                }
                debug!(start, end, "band finished");
                Band {
                    start,
                    cells_x,
                    cells_y,
                }
            })
        });
        let bands = try_join_all(workers).await?;

        let mut map_x = CoordinateMap::new(width, height);
        let mut map_y = CoordinateMap::new(width, height);
        {
            let cells_x: &mut [f32] = &mut map_x;
            let cells_y: &mut [f32] = &mut map_y;
            for band in bands {
                let offset = band.start as usize * row_len;
                cells_x[offset..offset + band.cells_x.len()].copy_from_slice(&band.cells_x);
                cells_y[offset..offset + band.cells_y.len()].copy_from_slice(&band.cells_y);
            }
        }

        let table = RemapTable::from_maps(map_x, map_y);
        report_build(&table, started);
        Ok(table)
    }
}
