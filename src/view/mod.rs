//! Read-only state handed to the frontend, and the channel it travels on.

pub mod commands;

use log::warn;
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Emitter};
use uuid::Uuid;

use crate::{
    overlay::Overlay,
    timer::{state::LapRow, TimerStatus},
};

pub const STATE_CHANGED_EVENT: &str = "stopwatch-state-changed";
pub const TICK_EVENT: &str = "stopwatch-tick";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    Timer,
    Records,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Timer => ViewMode::Records,
            ViewMode::Records => ViewMode::Timer,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ControlAction {
    Start,
    Lap,
    Stop,
    Reset,
    Resume,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControlButton {
    pub action: ControlAction,
    pub enabled: bool,
}

/// The pair of round buttons under the timer face.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub secondary: ControlButton,
    pub primary: ControlButton,
}

impl Controls {
    pub fn for_status(status: TimerStatus) -> Self {
        let button = |action, enabled| ControlButton { action, enabled };
        match status {
            TimerStatus::Idle => Self {
                secondary: button(ControlAction::Lap, false),
                primary: button(ControlAction::Start, true),
            },
            TimerStatus::Running => Self {
                secondary: button(ControlAction::Lap, true),
                primary: button(ControlAction::Stop, true),
            },
            TimerStatus::Stopped => Self {
                secondary: button(ControlAction::Reset, true),
                primary: button(ControlAction::Resume, true),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    /// Position in the full record list, used for deletion.
    pub index: usize,
    pub id: Uuid,
    pub title: String,
    pub lap_ms: u64,
    pub display: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchSnapshot {
    pub view: ViewMode,
    pub status: TimerStatus,
    pub elapsed_ms: u64,
    pub elapsed_display: String,
    pub controls: Controls,
    pub laps: Vec<LapRow>,
    pub records: Vec<RecordRow>,
    pub search_term: Option<String>,
    pub overlay: Overlay,
}

/// Where snapshots go after every state change.
pub trait SnapshotSink: Send + Sync {
    fn publish(&self, event: &str, snapshot: &StopwatchSnapshot);
}

impl SnapshotSink for AppHandle {
    fn publish(&self, event: &str, snapshot: &StopwatchSnapshot) {
        if let Err(err) = self.emit(event, snapshot) {
            warn!("failed to emit {event}: {err}");
        }
    }
}
