//! Statistics Output
//!
//! Opinion histograms and run statistics accumulated tick by tick.

use opinion_events::{CascadeEvent, CascadeEventType, HistogramSnapshot, TickSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::OutputError;

/// Statistics file name inside the output directory
pub const STATS_FILE_NAME: &str = "stats.json";

/// Default bin count over [-1, 1]
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Equal-width opinion histogram over [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct OpinionHistogram {
    counts: Vec<u32>,
}

impl OpinionHistogram {
    pub const MIN: f64 = -1.0;
    pub const MAX: f64 = 1.0;

    /// Bins `opinions` into `bins` buckets. Values outside the range are
    /// clamped onto the end bins; 1.0 falls into the last bin.
    pub fn from_opinions(opinions: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let bins = bins.max(1);
        let mut counts = vec![0u32; bins];
        let width = (Self::MAX - Self::MIN) / bins as f64;
        for opinion in opinions {
            let offset = (opinion.clamp(Self::MIN, Self::MAX) - Self::MIN) / width;
            let bin = (offset as usize).min(bins - 1);
            counts[bin] += 1;
        }
        Self { counts }
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn to_snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot {
            min: Self::MIN,
            max: Self::MAX,
            counts: self.counts.clone(),
        }
    }
}

/// Summary of a tick for history
#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    pub active_count: usize,
    pub opinion_mean: f64,
    pub opinion_range: f64,
    pub activations: usize,
    pub opinion_updates: usize,
}

/// Overall run statistics
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub total_ticks: u64,
    pub stop_reason: Option<String>,
    pub total_events: usize,
    pub events_by_type: BTreeMap<String, usize>,
    pub initial_active: usize,
    pub final_active: usize,
    pub final_positive: usize,
    pub final_negative: usize,
    pub final_histogram: Vec<u32>,
    pub tick_history: Vec<TickSummary>,
}

/// Accumulates statistics during a run.
#[derive(Debug, Default)]
pub struct StatsCollector {
    total_events: usize,
    events_by_type: BTreeMap<String, usize>,
    initial_active: Option<usize>,
    tick_history: Vec<TickSummary>,
    last: Option<TickSnapshot>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state after a tick and the events that produced it.
    /// The first snapshot recorded is taken as the initial state.
    pub fn record(&mut self, snapshot: &TickSnapshot, events: &[CascadeEvent]) {
        if self.initial_active.is_none() {
            self.initial_active = Some(snapshot.active_count);
        }

        let mut activations = 0;
        let mut opinion_updates = 0;
        for event in events {
            self.total_events += 1;
            *self
                .events_by_type
                .entry(event_type_name(event.event_type).to_string())
                .or_insert(0) += 1;
            if event.is_activation() {
                activations += 1;
            }
            if event.event_type != CascadeEventType::ActivatedUnchanged {
                opinion_updates += 1;
            }
        }

        self.tick_history.push(TickSummary {
            tick: snapshot.tick,
            active_count: snapshot.active_count,
            opinion_mean: snapshot.opinion_mean,
            opinion_range: snapshot.opinion_range(),
            activations,
            opinion_updates,
        });
        self.last = Some(snapshot.clone());
    }

    pub fn total_events(&self) -> usize {
        self.total_events
    }

    /// Generate final statistics
    pub fn generate_stats(&self, total_ticks: u64, stop_reason: Option<String>) -> RunStats {
        let (final_active, final_positive, final_negative, final_histogram) = match &self.last {
            Some(last) => (
                last.active_count,
                last.positive_count(),
                last.agents.len() - last.positive_count(),
                last.histogram.counts.clone(),
            ),
            None => (0, 0, 0, Vec::new()),
        };

        RunStats {
            total_ticks,
            stop_reason,
            total_events: self.total_events,
            events_by_type: self.events_by_type.clone(),
            initial_active: self.initial_active.unwrap_or(0),
            final_active,
            final_positive,
            final_negative,
            final_histogram,
            tick_history: self.tick_history.clone(),
        }
    }
}

fn event_type_name(event_type: CascadeEventType) -> &'static str {
    match event_type {
        CascadeEventType::Activated => "activated",
        CascadeEventType::ActivatedUnchanged => "activated_unchanged",
        CascadeEventType::OpinionUpdated => "opinion_updated",
    }
}

/// Writes statistics as pretty JSON into `dir`, creating it if needed.
pub fn write_stats(stats: &RunStats, dir: impl AsRef<Path>) -> Result<(), OutputError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(stats)?;
    fs::write(dir.join(STATS_FILE_NAME), json)?;
    Ok(())
}
