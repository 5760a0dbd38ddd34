// Library exports for testing and reuse

pub mod cli;
pub mod creation;
pub mod crs;
pub mod discover;
pub mod error;
pub mod grid;
pub mod io;
pub mod merge;
pub mod pipeline;
pub mod pixel;
pub mod remap;

// Re-export commonly used types
pub use error::{MergeError, Result};
pub use merge::MergeMethod;
pub use pipeline::{merge_and_remap, MergeConfig, MergeSummary};
pub use remap::SentinelRemap;
