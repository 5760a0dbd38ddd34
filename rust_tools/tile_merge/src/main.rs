use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use tile_merge::cli::Args;
use tile_merge::creation;
use tile_merge::discover::discover_tiles;
use tile_merge::error::Result;
use tile_merge::pipeline::{merge_and_remap, MergeConfig};
use tile_merge::remap::{SentinelRemap, LUKE_NODATA};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== GeoTIFF Tile Merge ===");

    // Set thread pool size if specified
    if let Some(n_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build_global()?;
        info!("Using {} threads", n_threads);
    } else {
        info!("Using all available threads");
    }

    creation::validate_compression(&args.compress)?;
    if args.tiled {
        creation::validate_tile_size(args.tile_size)?;
    }

    let inputs = discover_tiles(&args.input, &args.pattern)?;

    if args.nodata != LUKE_NODATA && args.remap_from.contains(&LUKE_NODATA) {
        warn!(
            "Pixels holding {} are rewritten to {} as well; pass --remap-from to narrow the sentinels",
            LUKE_NODATA, args.nodata
        );
    }

    let config = MergeConfig {
        inputs,
        output: args.output,
        remap: SentinelRemap::new(args.remap_from, args.nodata),
        method: args.method,
        creation_options: creation::create_dataset_options(
            &args.compress,
            args.tiled,
            args.tile_size,
        ),
    };

    info!(
        "Remapping {:?} to {}, writing {:?}",
        config.remap.from, config.remap.to, config.output
    );
    let summary = merge_and_remap(&config)?;

    info!(
        "Mosaic of {} tiles: {}x{}, {} band(s), {} pixels remapped",
        summary.tiles, summary.width, summary.height, summary.bands, summary.remapped
    );
    info!("=== Done! ===");
    Ok(())
}
