//! Projector CLI - builds remap tables between 360 image projections.
//!
//! Usage: projector [OPTIONS]
//!
//! The tool writes the x-map and y-map as raw little-endian `f32` files,
//! row-major, shaped like the output projection. Feed them to any resampler
//! that understands coordinate maps.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use projector::config::{ConversionConfig, ProjectionConfig, ProjectionKind};
use projector::{BandedRemapBuilder, CoordinateMap, CubemapLayout};

#[derive(Parser)]
#[command(name = "projector")]
#[command(author, version, about = "Build coordinate remap tables between 360 image projections", long_about = None)]
struct Cli {
    /// Conversion config file (TOML). Replaces the projection flags below.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Projection the source image is stored in
    #[arg(long, value_enum, default_value = "equirectangular")]
    in_projection: KindArg,

    /// Width of the source image in pixels
    #[arg(long, default_value = "4096")]
    in_width: u32,

    /// Projection to draw
    #[arg(long, value_enum, default_value = "cubemap")]
    out_projection: KindArg,

    /// Width of the drawn image in pixels
    #[arg(long, default_value = "4096")]
    output_width: u32,

    /// Cubemap face layout, for whichever side is a cubemap
    #[arg(long, value_enum, default_value = "strip")]
    layout: LayoutArg,

    /// Pixels reserved at each cubemap face edge
    #[arg(long, default_value = "0")]
    border_padding: u32,

    /// Number of row bands to compute concurrently (default: one per CPU)
    #[arg(long)]
    bands: Option<usize>,

    /// Output prefix; writes PREFIX.x.f32 and PREFIX.y.f32
    #[arg(short, long, default_value = "remap")]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Equirectangular,
    Cubemap,
}

impl From<KindArg> for ProjectionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Equirectangular => ProjectionKind::Equirectangular,
            KindArg::Cubemap => ProjectionKind::Cubemap,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Strip,
    Cross,
}

impl From<LayoutArg> for CubemapLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Strip => CubemapLayout::Strip,
            LayoutArg::Cross => CubemapLayout::Cross,
        }
    }
}

impl Cli {
    fn conversion(&self) -> anyhow::Result<ConversionConfig> {
        if let Some(path) = &self.config {
            return Ok(ConversionConfig::load(path)?);
        }
        let layout = CubemapLayout::from(self.layout);
        Ok(ConversionConfig::new(
            ProjectionConfig::for_image_width(
                self.in_projection.into(),
                self.in_width,
                self.border_padding,
                layout,
            ),
            ProjectionConfig::for_image_width(
                self.out_projection.into(),
                self.output_width,
                self.border_padding,
                layout,
            ),
        ))
    }
}

fn write_map(path: &Path, map: &CoordinateMap) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for value in map.as_raw() {
        writer.write_all(&value.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn map_path(prefix: &Path, axis: &str) -> PathBuf {
    PathBuf::from(format!("{}.{axis}.f32", prefix.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let conversion = cli.conversion()?;
    let builder = conversion.builder().context("invalid projection configuration")?;
    info!(
        input = ?conversion.input,
        output = ?conversion.output,
        "converting projections"
    );

    let mut banded = BandedRemapBuilder::new(builder);
    if let Some(bands) = cli.bands {
        banded = banded.with_band_count(bands);
    }

    let start = Instant::now();
    let table = banded.build_maps().await?;

    let x_path = map_path(&cli.output, "x");
    let y_path = map_path(&cli.output, "y");
    write_map(&x_path, table.map_x())?;
    write_map(&y_path, table.map_y())?;

    info!(
        width = table.width(),
        height = table.height(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        x_map = %x_path.display(),
        y_map = %y_path.display(),
        "remap table written"
    );
    Ok(())
}
