use crate::discover::DEFAULT_PATTERN;
use crate::merge::MergeMethod;
use crate::remap::{LUKE_NODATA, LUKE_OUTSIDE_AREA};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tile-merge")]
#[command(about = "Merge GeoTIFF tiles into one mosaic and remap no-data sentinels")]
#[command(version)]
#[command(allow_negative_numbers = true)]
pub struct Args {
    /// Input directory or glob pattern of tiles
    #[arg(value_name = "INPUT", default_value = "data/koivu*.tif")]
    pub input: String,

    /// Output GeoTIFF path
    #[arg(value_name = "OUTPUT", default_value = "out.tif")]
    pub output: PathBuf,

    /// Output nodata value that sentinels are rewritten to
    #[arg(value_name = "NODATA", default_value_t = LUKE_NODATA)]
    pub nodata: f64,

    /// Tile pattern used when INPUT is a directory
    #[arg(short, long, value_name = "GLOB", default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Sentinel values rewritten to NODATA
    #[arg(
        long,
        value_name = "VALUES",
        value_delimiter = ',',
        default_values_t = [LUKE_OUTSIDE_AREA, LUKE_NODATA]
    )]
    pub remap_from: Vec<f64>,

    /// How overlapping tiles are combined
    #[arg(short, long, value_enum, default_value_t = MergeMethod::First)]
    pub method: MergeMethod,

    /// Output compression (DEFLATE, LZW, ZSTD, PACKBITS, NONE)
    #[arg(long, value_name = "TYPE", default_value = "NONE")]
    pub compress: String,

    /// Write a tiled GeoTIFF instead of strips
    #[arg(long)]
    pub tiled: bool,

    /// Block size of a tiled output (multiple of 16)
    #[arg(long, value_name = "PIXELS", default_value_t = 256)]
    pub tile_size: usize,

    /// Number of threads (default: all available)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
