use crate::grid::{MosaicGrid, Window};
use crate::pixel::{same_value, Pixel};
use clap::ValueEnum;
use log::debug;
use ndarray::{s, Array3, ArrayView3, Zip};

/// How overlapping tiles are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MergeMethod {
    /// Earlier tiles win (only empty pixels are filled)
    #[default]
    First,
    /// Later tiles overwrite earlier ones
    Last,
    /// Keep the smallest valid value
    Min,
    /// Keep the largest valid value
    Max,
}

/// Mosaic canvas: `(bands, rows, cols)` samples on a [`MosaicGrid`].
#[derive(Debug, Clone)]
pub struct Mosaic<T> {
    pub data: Array3<T>,
    pub geotransform: [f64; 6],
    pub fill: T,
}

impl<T: Pixel> Mosaic<T> {
    pub fn new(bands: usize, grid: &MosaicGrid, fill: T) -> Self {
        Self {
            data: Array3::from_elem((bands, grid.height, grid.width), fill),
            geotransform: grid.geotransform(),
            fill,
        }
    }

    pub fn bands(&self) -> usize {
        self.data.dim().0
    }

    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    /// Combine a tile into the canvas at `window`.
    ///
    /// `tile` must have the window's shape. Parts of the window that fall
    /// outside the canvas are dropped. Tile pixels equal to `tile_nodata`
    /// never reach the canvas.
    pub fn paint(
        &mut self,
        tile: ArrayView3<T>,
        window: Window,
        tile_nodata: Option<T>,
        method: MergeMethod,
    ) {
        let (bands, rows, cols) = self.data.dim();
        let (tile_bands, tile_rows, tile_cols) = tile.dim();

        // Overlap of the window with the canvas, in canvas and tile coordinates
        let dst_col_start = window.col_off.max(0) as usize;
        let dst_row_start = window.row_off.max(0) as usize;
        let dst_col_end = (window.col_off + tile_cols as isize).clamp(0, cols as isize) as usize;
        let dst_row_end = (window.row_off + tile_rows as isize).clamp(0, rows as isize) as usize;

        if dst_col_start >= dst_col_end || dst_row_start >= dst_row_end {
            debug!("Window {:?} lies outside the mosaic, skipping", window);
            return;
        }

        let src_col_start = (dst_col_start as isize - window.col_off) as usize;
        let src_row_start = (dst_row_start as isize - window.row_off) as usize;
        let n_cols = dst_col_end - dst_col_start;
        let n_rows = dst_row_end - dst_row_start;
        let n_bands = bands.min(tile_bands);

        let src = tile.slice(s![
            ..n_bands,
            src_row_start..src_row_start + n_rows,
            src_col_start..src_col_start + n_cols
        ]);
        let dst = self.data.slice_mut(s![
            ..n_bands,
            dst_row_start..dst_row_end,
            dst_col_start..dst_col_end
        ]);

        let fill = self.fill;
        Zip::from(dst).and(&src).for_each(|old, &new| {
            if let Some(nd) = tile_nodata {
                if same_value(new, nd) {
                    return;
                }
            }
            *old = combine(*old, new, fill, method);
        });
    }
}

/// Combine one valid tile sample with the current canvas sample.
#[inline]
fn combine<T: Pixel>(old: T, new: T, fill: T, method: MergeMethod) -> T {
    let empty = same_value(old, fill);
    match method {
        MergeMethod::First if empty => new,
        MergeMethod::First => old,
        MergeMethod::Last => new,
        MergeMethod::Min if empty || new < old => new,
        MergeMethod::Max if empty || new > old => new,
        MergeMethod::Min | MergeMethod::Max => old,
    }
}
