//! Rendering of elapsed durations as `MM:SS:CC` text.

use serde::Serialize;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

/// An elapsed duration split into the components shown on screen.
///
/// Minutes wrap at the hour, matching a stopwatch face with no hour field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ElapsedParts {
    pub minutes: u64,
    pub seconds: u64,
    pub centiseconds: u64,
}

impl ElapsedParts {
    pub fn from_millis(ms: u64) -> Self {
        Self {
            minutes: (ms / MS_PER_MINUTE) % 60,
            seconds: (ms / MS_PER_SECOND) % 60,
            centiseconds: (ms % MS_PER_SECOND) / 10,
        }
    }
}

impl std::fmt::Display for ElapsedParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.centiseconds
        )
    }
}

pub fn format_elapsed(ms: u64) -> String {
    ElapsedParts::from_millis(ms).to_string()
}
