use crate::error::Result;
use crate::pixel::{from_f64, same_value, Pixel};
use log::{debug, info};
use ndarray::Array3;
use rayon::prelude::*;

/// LUKE rasters mark areas outside the inventory (sea, foreign land) with this value
pub const LUKE_OUTSIDE_AREA: f64 = 32766.0;

/// Shared no-data value of the LUKE volume and age maps
pub const LUKE_NODATA: f64 = 32767.0;

/// Rewrite every pixel holding one of `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct SentinelRemap {
    pub from: Vec<f64>,
    pub to: f64,
}

impl Default for SentinelRemap {
    fn default() -> Self {
        Self {
            from: vec![LUKE_OUTSIDE_AREA, LUKE_NODATA],
            to: LUKE_NODATA,
        }
    }
}

impl SentinelRemap {
    pub fn new(from: Vec<f64>, to: f64) -> Self {
        Self { from, to }
    }

    /// Apply the remap to a mosaic of sample type `T`.
    ///
    /// Sentinels that equal the target are dropped, so the identity case
    /// (32767 -> 32767) costs nothing. Sentinels `T` cannot hold never occur
    /// in the data and are skipped. Fails only if the target cannot be
    /// stored as `T`.
    pub fn apply<T: Pixel>(&self, data: &mut Array3<T>) -> Result<usize> {
        let to: T = from_f64(self.to)?;
        let from = self
            .from
            .iter()
            .filter_map(|&v| match from_f64::<T>(v) {
                Ok(sentinel) => Some(sentinel),
                Err(e) => {
                    debug!("Skipping sentinel: {}", e);
                    None
                }
            })
            .filter(|&v| !same_value(v, to))
            .collect::<Vec<T>>();

        if from.is_empty() {
            debug!("Nothing to remap, all sentinels already equal {}", self.to);
            return Ok(0);
        }

        let count = remap_sentinels(data, &from, to);
        info!("Remapped {} pixels from {:?} to {}", count, self.from, self.to);
        Ok(count)
    }
}

/// Replace, in place, every sample equal to one of `from` by `to`.
/// Returns the number of replaced samples.
pub fn remap_sentinels<T: Pixel>(data: &mut Array3<T>, from: &[T], to: T) -> usize {
    let is_sentinel = |v: T| from.iter().any(|&s| same_value(v, s));

    match data.as_slice_memory_order_mut() {
        Some(slice) => slice
            .par_iter_mut()
            .map(|v| {
                if is_sentinel(*v) {
                    *v = to;
                    1
                } else {
                    0
                }
            })
            .sum(),
        None => {
            let mut count = 0;
            data.iter_mut().filter(|v| is_sentinel(**v)).for_each(|v| {
                *v = to;
                count += 1;
            });
            count
        }
    }
}
