use crate::error::{MergeError, Result};
use log::debug;
use std::path::Path;

/// Geographic extent of a north-up raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }
}

/// Compute the bounds of a raster from its geotransform.
///
/// Rotated and south-up transforms are rejected: the mosaic grid is always
/// axis aligned with the origin in the upper-left corner.
pub fn bounds_from_geotransform(
    path: &Path,
    geotransform: &[f64; 6],
    width: usize,
    height: usize,
) -> Result<Bounds> {
    let [x0, dx, rx, y0, ry, dy] = *geotransform;

    if rx != 0.0 || ry != 0.0 || dx <= 0.0 || dy >= 0.0 {
        return Err(MergeError::UnsupportedTransform {
            path: path.to_path_buf(),
            geotransform: *geotransform,
        });
    }

    Ok(Bounds {
        left: x0,
        bottom: y0 + height as f64 * dy,
        right: x0 + width as f64 * dx,
        top: y0,
    })
}

/// Pixel window inside the mosaic, in output pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub col_off: isize,
    pub row_off: isize,
    pub width: usize,
    pub height: usize,
}

/// Output grid of a mosaic.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicGrid {
    pub bounds: Bounds,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub width: usize,
    pub height: usize,
}

impl MosaicGrid {
    /// Grid covering every extent in `tiles` at the given resolution.
    /// Returns `None` for an empty iterator.
    pub fn covering<I>(tiles: I, pixel_width: f64, pixel_height: f64) -> Option<Self>
    where
        I: IntoIterator<Item = Bounds>,
    {
        let bounds = tiles.into_iter().reduce(|acc, b| acc.union(&b))?;

        let width = (((bounds.right - bounds.left) / pixel_width).round() as usize).max(1);
        let height = (((bounds.top - bounds.bottom) / pixel_height).round() as usize).max(1);

        debug!(
            "MosaicGrid: bounds=[{}, {}, {}, {}], pixel={}x{} → {}x{}",
            bounds.left, bounds.bottom, bounds.right, bounds.top, pixel_width, pixel_height, width, height
        );

        Some(Self {
            bounds,
            pixel_width,
            pixel_height,
            width,
            height,
        })
    }

    /// GDAL-ordered geotransform of the grid.
    pub fn geotransform(&self) -> [f64; 6] {
        [
            self.bounds.left,
            self.pixel_width,
            0.0,
            self.bounds.top,
            0.0,
            -self.pixel_height,
        ]
    }

    /// Destination window for a raster with the given bounds, rounded to
    /// whole output pixels.
    pub fn window_for(&self, bounds: &Bounds) -> Window {
        let col_off = ((bounds.left - self.bounds.left) / self.pixel_width).round() as isize;
        let row_off = ((self.bounds.top - bounds.top) / self.pixel_height).round() as isize;
        let width = ((bounds.right - bounds.left) / self.pixel_width).round() as usize;
        let height = ((bounds.top - bounds.bottom) / self.pixel_height).round() as usize;

        Window {
            col_off,
            row_off,
            width: width.max(1),
            height: height.max(1),
        }
    }
}
