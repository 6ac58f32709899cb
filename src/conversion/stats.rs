//! Statistics for batch conversion runs

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Counters collected over one batch run.
///
/// `converted_units` counts units that went through the converter;
/// `skipped_units` counts units copied through unchanged (blank units,
/// non-text scalars, and every unit of an identity run).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub total_units: usize,
    pub converted_units: usize,
    pub skipped_units: usize,
    pub processing_time_ms: u64,
    /// Timestamp of when the run finished
    pub collected_at: chrono::DateTime<chrono::Utc>,
}

impl RunStats {
    pub fn begin(total_units: usize) -> Self {
        Self {
            total_units,
            converted_units: 0,
            skipped_units: 0,
            processing_time_ms: 0,
            collected_at: chrono::Utc::now(),
        }
    }

    pub fn record_converted(&mut self) {
        self.converted_units += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped_units += 1;
    }

    /// Stamp the elapsed time and collection timestamp.
    pub fn finish(mut self, started: Instant) -> Self {
        self.processing_time_ms = started.elapsed().as_millis() as u64;
        self.collected_at = chrono::Utc::now();
        self
    }

    /// Plain-text rendering for the `--stats` flag
    pub fn render_text(&self) -> String {
        format!(
            "Units: {} total, {} converted, {} unchanged\nProcessing time: {}ms",
            self.total_units, self.converted_units, self.skipped_units, self.processing_time_ms
        )
    }

    /// JSON rendering for machine consumers
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
