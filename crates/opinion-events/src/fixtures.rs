//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // opinion-events = { path = "../opinion-events", features = ["test-fixtures"] }
//!
//! use opinion_events::fixtures;
//!
//! let snapshots = fixtures::sample_snapshots();
//! let events = fixtures::sample_events();
//! ```

use crate::{CascadeEvent, TickSnapshot};

/// Returns three consecutive tick snapshots of a 4-agent run.
///
/// Tick 0 has one active agent, tick 1 two, tick 2 all four.
pub fn sample_snapshots() -> Vec<TickSnapshot> {
    let jsonl = include_str!("../tests/fixtures/sample_snapshots.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            TickSnapshot::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse snapshot line: {}\nError: {}", l, e)
            })
        })
        .collect()
}

/// Returns the cascade events matching `sample_snapshots`.
pub fn sample_events() -> Vec<CascadeEvent> {
    let jsonl = include_str!("../tests/fixtures/sample_events.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            CascadeEvent::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse event line: {}\nError: {}", l, e)
            })
        })
        .collect()
}
