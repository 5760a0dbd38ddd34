use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("No input tiles matched {0}")]
    NoInputFiles(String),

    #[error("Input raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Pixel size is non-positive: {0}")]
    InvalidPixelSize(f64),

    #[error("Unsupported geotransform in {path:?}: {geotransform:?} (only north-up rasters can be merged)")]
    UnsupportedTransform {
        path: PathBuf,
        geotransform: [f64; 6],
    },

    #[error("Band count mismatch in {path:?}: expected {expected}, found {found}")]
    BandCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported raster data type: {0}")]
    UnsupportedDataType(String),

    #[error("Value {value} cannot be stored as {data_type}")]
    UnrepresentableValue { value: f64, data_type: &'static str },

    #[error("Invalid compression type: {0}")]
    InvalidCompression(String),

    #[error("Invalid tile size: {0} (must be multiple of 16)")]
    InvalidTileSize(usize),
}

pub type Result<T> = std::result::Result<T, MergeError>;
