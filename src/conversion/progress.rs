//! Progress reporting for batch runs

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::content::ContentModel;
use crate::conversion::stats::RunStats;
use crate::error::ConvertError;

/// Snapshot of how far a run has progressed.
///
/// `completed_units` is monotonically non-decreasing within one run and
/// starts at zero; the final event of a successful run carries
/// `completed_units == total_units`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    pub completed_units: usize,
    pub total_units: usize,
    pub current_label: String,
}

impl ProgressState {
    pub fn begin(total_units: usize) -> Self {
        Self {
            completed_units: 0,
            total_units,
            current_label: String::new(),
        }
    }

    /// Advance past one unit and record where the traversal is.
    pub fn advance(&mut self, label: String) {
        self.completed_units += 1;
        self.current_label = label;
    }

    pub fn is_finished(&self) -> bool {
        self.completed_units >= self.total_units
    }

    pub fn percent(&self) -> u8 {
        if self.total_units == 0 {
            return 100;
        }
        ((self.completed_units * 100) / self.total_units) as u8
    }
}

/// Events marshaled from the worker thread to the caller.
///
/// A run emits any number of `Progress` events in traversal order, then
/// exactly one terminal event: `Finished` or `Failed`.
#[derive(Debug)]
pub enum RunEvent {
    Progress(ProgressState),
    Finished { model: ContentModel, stats: RunStats },
    Failed(ConvertError),
}

/// Where the batch converter reports progress after each unit
pub trait ProgressSink {
    fn on_progress(&mut self, state: &ProgressState);
}

/// Sink that discards progress, for synchronous bounded previews
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&mut self, _state: &ProgressState) {}
}

/// Sink that forwards progress over an mpsc channel. Send failures are
/// ignored: a dropped receiver means nobody is watching anymore, and the
/// run still finishes on its own terms.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<RunEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<RunEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn on_progress(&mut self, state: &ProgressState) {
        let _ = self.tx.send(RunEvent::Progress(state.clone()));
    }
}

/// Sink that records every state it sees, for assertions in tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub states: Vec<ProgressState>,
}

impl ProgressSink for RecordingSink {
    fn on_progress(&mut self, state: &ProgressState) {
        self.states.push(state.clone());
    }
}
