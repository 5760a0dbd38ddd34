use crate::crs::check_projections;
use crate::error::{MergeError, Result};
use crate::grid::MosaicGrid;
use crate::io::{read_tile, read_tile_info, write_mosaic, TileInfo};
use crate::merge::{MergeMethod, Mosaic};
use crate::pixel::{from_f64, Pixel};
use crate::remap::SentinelRemap;
use gdal::raster::GdalDataType;
use gdal::Dataset;
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::Builder;

/// Inputs of one merge-and-remap run
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub remap: SentinelRemap,
    pub method: MergeMethod,
    pub creation_options: Vec<String>,
}

impl MergeConfig {
    pub fn new(inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            output: output.into(),
            remap: SentinelRemap::default(),
            method: MergeMethod::default(),
            creation_options: Vec::new(),
        }
    }
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    pub tiles: usize,
    pub width: usize,
    pub height: usize,
    pub bands: usize,
    pub geotransform: [f64; 6],
    pub remapped: usize,
}

/// Merge every input tile into one raster at `config.output`, rewriting
/// sentinel values on the way.
///
/// The output is written to a temporary file next to the target and only
/// renamed into place once complete; a failed run leaves no output behind.
pub fn merge_and_remap(config: &MergeConfig) -> Result<MergeSummary> {
    if config.inputs.is_empty() {
        return Err(MergeError::NoInputFiles(String::from("<empty input list>")));
    }

    let tiles = config
        .inputs
        .iter()
        .map(|path| read_tile_info(path))
        .collect::<Result<Vec<TileInfo>>>()?;

    let first = &tiles[0];
    for tile in &tiles[1..] {
        if tile.band_count != first.band_count {
            return Err(MergeError::BandCountMismatch {
                path: tile.path.clone(),
                expected: first.band_count,
                found: tile.band_count,
            });
        }
    }
    check_projections(&tiles);

    info!(
        "Merging {} tiles ({} band(s) of {:?}) with method {:?}",
        tiles.len(),
        first.band_count,
        first.data_type,
        config.method
    );

    match first.data_type {
        GdalDataType::UInt8 => merge_typed::<u8>(config, &tiles),
        GdalDataType::UInt16 => merge_typed::<u16>(config, &tiles),
        GdalDataType::Int16 => merge_typed::<i16>(config, &tiles),
        GdalDataType::UInt32 => merge_typed::<u32>(config, &tiles),
        GdalDataType::Int32 => merge_typed::<i32>(config, &tiles),
        GdalDataType::Float32 => merge_typed::<f32>(config, &tiles),
        GdalDataType::Float64 => merge_typed::<f64>(config, &tiles),
        other => Err(MergeError::UnsupportedDataType(format!("{:?}", other))),
    }
}

fn merge_typed<T: Pixel>(config: &MergeConfig, tiles: &[TileInfo]) -> Result<MergeSummary> {
    let first = &tiles[0];

    let bounds = tiles
        .iter()
        .map(TileInfo::bounds)
        .collect::<Result<Vec<_>>>()?;
    let grid = MosaicGrid::covering(bounds.iter().copied(), first.pixel_width, first.pixel_height)
        .ok_or_else(|| MergeError::NoInputFiles(String::from("<empty input list>")))?;

    info!(
        "Mosaic grid: {}x{} at {:.6} x {:.6}",
        grid.width, grid.height, grid.pixel_width, grid.pixel_height
    );

    let fill: T = match first.nodata {
        Some(nd) => from_f64(nd)?,
        None => T::default(),
    };
    let mut mosaic = Mosaic::new(first.band_count, &grid, fill);

    for (tile, tile_bounds) in tiles.iter().zip(&bounds) {
        let window = grid.window_for(tile_bounds);
        debug!("Painting {:?} at {:?}", tile.path, window);

        // Tile nodata that the sample type cannot hold never occurs in the data
        let tile_nodata = tile.nodata.and_then(|nd| from_f64::<T>(nd).ok());

        let dataset = Dataset::open(&tile.path)?;
        let data = read_tile::<T>(&dataset, (window.width, window.height))?;
        mosaic.paint(data.view(), window, tile_nodata, config.method);
    }

    let remapped = config.remap.apply(&mut mosaic.data)?;

    write_atomically(&config.output, |path| {
        write_mosaic(
            path,
            &mosaic,
            &first.projection,
            Some(config.remap.to),
            &config.creation_options,
        )
    })?;

    Ok(MergeSummary {
        tiles: tiles.len(),
        width: mosaic.width(),
        height: mosaic.height(),
        bands: mosaic.bands(),
        geotransform: mosaic.geotransform,
        remapped,
    })
}

/// Run `write` against a temporary file in the output directory and move
/// the result to `output` once it succeeded.
fn write_atomically<F>(output: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = Builder::new()
        .prefix(".tile-merge-")
        .suffix(".tif")
        .tempfile_in(dir)?;

    write(temp.path())?;
    set_output_permissions(temp.path(), output)?;

    temp.persist(output).map_err(|e| e.error)?;
    info!("Output written to {:?}", output);
    Ok(())
}

/// Temporary files are created owner-only. Give the output the mode of the
/// file it replaces, or rw-r--r-- when there is none.
#[cfg(unix)]
fn set_output_permissions(temp: &Path, output: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match fs::metadata(output) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == ErrorKind::NotFound => fs::Permissions::from_mode(0o644),
        Err(e) => return Err(e.into()),
    };
    debug!("Output mode: {:o}", permissions.mode() & 0o777);
    fs::set_permissions(temp, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_output_permissions(_temp: &Path, _output: &Path) -> Result<()> {
    Ok(())
}
