//! Batch conversion pipeline
//!
//! This module contains the unit traversal, progress reporting, bounded
//! preview and run statistics.

pub mod batch;
pub mod preview;
pub mod progress;
pub mod stats;

pub use batch::{spawn_run, BatchConverter};
pub use preview::{preview, PreviewLimits, PreviewResult};
pub use progress::{ChannelSink, NullSink, ProgressSink, ProgressState, RunEvent};
pub use stats::RunStats;
