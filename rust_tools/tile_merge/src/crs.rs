use crate::io::TileInfo;
use gdal::spatial_ref::SpatialRef;
use log::{debug, warn};

/// Check whether two projection WKT strings describe the same CRS.
///
/// Identical strings match without parsing. A missing projection only
/// matches another missing projection.
pub fn projections_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }

    match (SpatialRef::from_wkt(a), SpatialRef::from_wkt(b)) {
        (Ok(sa), Ok(sb)) => sa == sb,
        (Err(e), _) | (_, Err(e)) => {
            debug!("Failed to parse projection WKT, comparing as text: {}", e);
            false
        }
    }
}

/// Warn about tiles whose CRS differs from the first tile. Tiles are not
/// reprojected; they are placed by their geotransform as-is.
/// Returns the number of mismatching tiles.
pub fn check_projections(tiles: &[TileInfo]) -> usize {
    let Some(reference) = tiles.first() else {
        return 0;
    };

    let mismatches = tiles[1..]
        .iter()
        .filter(|tile| !projections_match(&reference.projection, &tile.projection))
        .inspect(|tile| {
            warn!(
                "CRS of {:?} differs from {:?}; tile is placed without reprojection",
                tile.path, reference.path
            )
        })
        .count();

    if mismatches == 0 {
        debug!("All {} tiles share the same CRS", tiles.len());
    }
    mismatches
}
