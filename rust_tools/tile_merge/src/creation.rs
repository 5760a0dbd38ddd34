use crate::error::{MergeError, Result};
use log::debug;

const VALID_COMPRESSION: [&str; 5] = ["DEFLATE", "LZW", "ZSTD", "PACKBITS", "NONE"];

/// Validate compression type
pub fn validate_compression(compression: &str) -> Result<()> {
    if !VALID_COMPRESSION.contains(&compression) {
        return Err(MergeError::InvalidCompression(compression.to_string()));
    }
    Ok(())
}

/// Validate tile size (must be multiple of 16)
pub fn validate_tile_size(tile_size: usize) -> Result<()> {
    if tile_size == 0 || tile_size % 16 != 0 {
        return Err(MergeError::InvalidTileSize(tile_size));
    }
    Ok(())
}

/// GTiff creation options for the mosaic
pub fn create_dataset_options(compression: &str, tiled: bool, tile_size: usize) -> Vec<String> {
    let mut options = vec![format!("COMPRESS={}", compression)];

    if tiled {
        options.push("TILED=YES".to_string());
        options.push(format!("BLOCKXSIZE={}", tile_size));
        options.push(format!("BLOCKYSIZE={}", tile_size));
    }

    options.push("BIGTIFF=IF_SAFER".to_string());

    debug!("Creation options: {:?}", options);
    options
}
