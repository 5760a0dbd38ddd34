use crate::error::{MergeError, Result};
use crate::grid::{bounds_from_geotransform, Bounds};
use crate::merge::Mosaic;
use crate::pixel::Pixel;
use gdal::cpl::CslStringList;
use gdal::raster::{Buffer, GdalDataType, RasterBand, ResampleAlg};
use gdal::{Dataset, DriverManager};
use log::{debug, info};
use ndarray::{Array2, Array3, Axis};
use std::path::{Path, PathBuf};

/// Metadata of one input tile.
#[derive(Debug, Clone)]
pub struct TileInfo {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub geotransform: [f64; 6],
    pub projection: String,
    pub nodata: Option<f64>,
    pub data_type: GdalDataType,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl TileInfo {
    pub fn bounds(&self) -> Result<Bounds> {
        bounds_from_geotransform(&self.path, &self.geotransform, self.width, self.height)
    }
}

/// Open a tile and read its metadata. The dataset is closed on return.
pub fn read_tile_info(path: &Path) -> Result<TileInfo> {
    debug!("Opening tile: {:?}", path);
    let dataset = Dataset::open(path)?;
    extract_metadata_from_dataset(path, &dataset)
}

/// Extract metadata from a dataset without reading any samples
pub fn extract_metadata_from_dataset(path: &Path, dataset: &Dataset) -> Result<TileInfo> {
    let rasterband: RasterBand = dataset.rasterband(1)?;

    let (width, height) = dataset.raster_size();
    if width == 0 || height == 0 {
        return Err(MergeError::InvalidDimensions(width, height));
    }

    let geotransform = dataset.geo_transform()?;
    let pixel_width = geotransform[1].abs();
    let pixel_height = geotransform[5].abs();

    if pixel_width <= 0.0 {
        return Err(MergeError::InvalidPixelSize(pixel_width));
    }
    if pixel_height <= 0.0 {
        return Err(MergeError::InvalidPixelSize(pixel_height));
    }

    Ok(TileInfo {
        path: path.to_path_buf(),
        width,
        height,
        band_count: dataset.raster_count() as usize,
        geotransform,
        projection: dataset.projection(),
        nodata: rasterband.no_data_value(),
        data_type: rasterband.band_type(),
        pixel_width,
        pixel_height,
    })
}

/// Read every band of a tile, resampled (nearest neighbour) to `size`
/// as `(cols, rows)`. Result shape is `(bands, rows, cols)`.
pub fn read_tile<T: Pixel>(dataset: &Dataset, size: (usize, usize)) -> Result<Array3<T>> {
    let (width, height) = dataset.raster_size();
    let band_count = dataset.raster_count() as usize;
    let (out_cols, out_rows) = size;

    if (out_cols, out_rows) != (width, height) {
        debug!(
            "Resampling tile from {}x{} to {}x{}",
            width, height, out_cols, out_rows
        );
    }

    let mut bands: Vec<Array2<T>> = Vec::with_capacity(band_count);
    for band_index in 1..=band_count {
        let rasterband = dataset.rasterband(band_index)?;
        let buffer = rasterband.read_as::<T>(
            (0, 0),
            (width, height),
            (out_cols, out_rows),
            Some(ResampleAlg::NearestNeighbour),
        )?;
        let data_vec: Vec<T> = buffer.into_iter().collect();
        bands.push(Array2::from_shape_vec((out_rows, out_cols), data_vec)?);
    }

    let views: Vec<_> = bands.iter().map(|b| b.view()).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}

/// Write a mosaic as GeoTIFF with the sample type `T`.
pub fn write_mosaic<T: Pixel>(
    path: &Path,
    mosaic: &Mosaic<T>,
    projection: &str,
    nodata: Option<f64>,
    options: &[String],
) -> Result<()> {
    info!("Creating output raster: {:?}", path);

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let (width, height, band_count) = (mosaic.width(), mosaic.height(), mosaic.bands());

    let mut gdal_options = CslStringList::new();
    for opt in options {
        gdal_options.add_string(opt)?;
    }

    let mut dataset = driver.create_with_band_type_with_options::<T, _>(
        path,
        width,
        height,
        band_count,
        &gdal_options,
    )?;

    dataset.set_geo_transform(&mosaic.geotransform)?;
    if !projection.is_empty() {
        dataset.set_projection(projection)?;
    }

    for (i, band_data) in mosaic.data.outer_iter().enumerate() {
        let band_index = i + 1;
        debug!("Writing band {}", band_index);

        let mut raster_band = dataset.rasterband(band_index)?;

        // GDAL expects row-major samples, which is how the standard layout stores them
        let samples: Vec<T> = band_data.iter().copied().collect();
        let mut buffer = Buffer::new((width, height), samples);
        raster_band.write((0, 0), (width, height), &mut buffer)?;
        if nodata.is_some() {
            raster_band.set_no_data_value(nodata)?;
        }
    }

    info!(
        "Wrote {}x{} mosaic with {} band(s) of {}",
        width,
        height,
        band_count,
        T::NAME
    );
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::creation::create_dataset_options;
    use crate::grid::MosaicGrid;
    use gdal::Metadata;
    use ndarray::arr3;
    use tempfile::tempdir;

    /// Write a GeoTIFF test tile with one band per outer slice of `data`,
    /// origin `(x0, y0)` and unit pixels
    pub(crate) fn write_bands<T: Pixel>(
        path: &Path,
        data: &Array3<T>,
        origin: (f64, f64),
        nodata: Option<f64>,
    ) {
        let (bands, rows, cols) = data.dim();
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut dataset = driver
            .create_with_band_type::<T, _>(path, cols, rows, bands)
            .unwrap();
        dataset
            .set_geo_transform(&[origin.0, 1.0, 0.0, origin.1, 0.0, -1.0])
            .unwrap();

        for (i, band_data) in data.outer_iter().enumerate() {
            let mut band = dataset.rasterband(i + 1).unwrap();
            let mut buffer = Buffer::new((cols, rows), band_data.iter().copied().collect());
            band.write((0, 0), (cols, rows), &mut buffer).unwrap();
            if nodata.is_some() {
                band.set_no_data_value(nodata).unwrap();
            }
        }
    }

    /// Single-band shorthand for [`write_bands`]
    pub(crate) fn write_tile<T: Pixel>(
        path: &Path,
        data: &Array2<T>,
        origin: (f64, f64),
        nodata: Option<f64>,
    ) {
        write_bands(path, &data.clone().insert_axis(Axis(0)), origin, nodata);
    }

    #[test]
    fn test_tile_info_roundtrip_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tile.tif");
        write_tile(&path, &Array2::from_elem((2, 3), 7i16), (10.0, 20.0), Some(32767.0));

        let info = read_tile_info(&path).unwrap();
        assert_eq!(info.width, 3);
        assert_eq!(info.height, 2);
        assert_eq!(info.band_count, 1);
        assert_eq!(info.nodata, Some(32767.0));
        assert_eq!(info.data_type, GdalDataType::Int16);
        assert_eq!(info.geotransform, [10.0, 1.0, 0.0, 20.0, 0.0, -1.0]);

        let bounds = info.bounds().unwrap();
        assert_eq!((bounds.left, bounds.bottom, bounds.right, bounds.top), (10.0, 18.0, 13.0, 20.0));
    }

    #[test]
    fn test_read_tile_resamples_to_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tile.tif");
        let data = Array2::from_shape_vec((2, 2), vec![1u8, 2, 3, 4]).unwrap();
        write_tile(&path, &data, (0.0, 2.0), None);

        let dataset = Dataset::open(&path).unwrap();
        let native = read_tile::<u8>(&dataset, (2, 2)).unwrap();
        assert_eq!(native, arr3(&[[[1, 2], [3, 4]]]));

        let doubled = read_tile::<u8>(&dataset, (4, 4)).unwrap();
        assert_eq!(doubled.dim(), (1, 4, 4));
        assert_eq!(doubled[[0, 0, 0]], 1);
        assert_eq!(doubled[[0, 3, 3]], 4);
    }

    #[test]
    fn test_write_mosaic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mosaic.tif");
        let grid = MosaicGrid::covering(
            [Bounds {
                left: 0.0,
                bottom: 0.0,
                right: 2.0,
                top: 1.0,
            }],
            1.0,
            1.0,
        )
        .unwrap();
        let mut mosaic = Mosaic::new(2, &grid, 0i32);
        mosaic.data = arr3(&[[[1, 2]], [[3, 4]]]);

        write_mosaic(&path, &mosaic, "", Some(-1.0), &[]).unwrap();

        let info = read_tile_info(&path).unwrap();
        assert_eq!(info.band_count, 2);
        assert_eq!(info.data_type, GdalDataType::Int32);
        assert_eq!(info.nodata, Some(-1.0));

        let dataset = Dataset::open(&path).unwrap();
        assert_eq!(read_tile::<i32>(&dataset, (2, 1)).unwrap(), mosaic.data);
    }

    #[test]
    fn test_write_mosaic_tiled_and_compressed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiled.tif");
        let grid = MosaicGrid::covering(
            [Bounds {
                left: 0.0,
                bottom: 0.0,
                right: 40.0,
                top: 20.0,
            }],
            1.0,
            1.0,
        )
        .unwrap();
        let mut mosaic = Mosaic::new(1, &grid, 0i16);
        mosaic.data = Array3::from_shape_fn((1, 20, 40), |(_, r, c)| (r * 40 + c) as i16);

        let options = create_dataset_options("DEFLATE", true, 16);
        write_mosaic(&path, &mosaic, "", Some(32767.0), &options).unwrap();

        let dataset = Dataset::open(&path).unwrap();
        assert_eq!(dataset.rasterband(1).unwrap().block_size(), (16, 16));
        assert_eq!(
            dataset.metadata_item("COMPRESSION", "IMAGE_STRUCTURE"),
            Some("DEFLATE".to_string())
        );
        assert_eq!(read_tile::<i16>(&dataset, (40, 20)).unwrap(), mosaic.data);
    }
}
