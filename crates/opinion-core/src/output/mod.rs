//! Output
//!
//! Edge list export, JSONL snapshot and event streams, and run statistics.
//! Everything here reads engine state; nothing feeds back into a run.

pub mod edgelist;
pub mod logger;
pub mod stats;

pub use edgelist::{
    read_edge_list, read_edge_list_file, write_edge_list, write_edge_list_file, EdgeRecord,
    EDGE_LIST_FILE_NAME,
};
pub use logger::{EventLogger, JsonlLogger, SnapshotLogger, EVENTS_FILE_NAME, SNAPSHOTS_FILE_NAME};
pub use stats::{
    write_stats, OpinionHistogram, RunStats, StatsCollector, DEFAULT_HISTOGRAM_BINS,
    STATS_FILE_NAME,
};
