use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::display::format_elapsed;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Clock readings bounding the lap segment currently being timed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start_ms: u64,
    pub now_ms: u64,
}

impl Segment {
    fn at(now_ms: u64) -> Self {
        Self {
            start_ms: now_ms,
            now_ms,
        }
    }

    pub fn delta_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.start_ms)
    }
}

/// One row of the laps list, most recent lap first.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LapRow {
    pub number: usize,
    pub lap_ms: u64,
    pub display: String,
    pub current: bool,
    pub fastest: bool,
    pub slowest: bool,
}

/// Lap accumulation state machine.
///
/// `laps` is stored most-recent-first. While the stopwatch has been started,
/// `laps[0]` is the lap being timed: its stored value holds the time banked
/// before the last stop, and the live `segment` delta is added on top of it.
#[derive(Debug, Clone, Default)]
pub struct LapEngine {
    status: TimerStatus,
    laps: Vec<u64>,
    segment: Option<Segment>,
}

impl LapEngine {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    #[cfg(test)]
    pub fn segment(&self) -> Option<Segment> {
        self.segment
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn live_delta_ms(&self) -> u64 {
        self.segment.map(|segment| segment.delta_ms()).unwrap_or(0)
    }

    pub fn total_elapsed_ms(&self) -> u64 {
        self.laps
            .iter()
            .sum::<u64>()
            .saturating_add(self.live_delta_ms())
    }

    pub fn start(&mut self, now_ms: u64) -> Result<()> {
        if self.status != TimerStatus::Idle {
            bail!("stopwatch already started");
        }
        self.laps = vec![0];
        self.segment = Some(Segment::at(now_ms));
        self.status = TimerStatus::Running;
        Ok(())
    }

    /// Refreshes the live reading. Readings earlier than the segment start
    /// are clamped so the live delta never goes negative.
    pub fn tick(&mut self, now_ms: u64) {
        if self.status != TimerStatus::Running {
            return;
        }
        if let Some(segment) = self.segment.as_mut() {
            segment.now_ms = now_ms.max(segment.start_ms);
        }
    }

    pub fn lap(&mut self, now_ms: u64) -> Result<()> {
        if self.status != TimerStatus::Running {
            bail!("cannot record a lap while the stopwatch is not running");
        }
        let finished = self.bank_segment(now_ms);
        let lap_started_at = self.segment_now();
        self.laps[0] = finished;
        self.laps.insert(0, 0);
        self.segment = Some(Segment::at(lap_started_at));
        Ok(())
    }

    pub fn stop(&mut self, now_ms: u64) -> Result<()> {
        if self.status != TimerStatus::Running {
            bail!("stopwatch is not running");
        }
        let finished = self.bank_segment(now_ms);
        self.laps[0] = finished;
        self.segment = None;
        self.status = TimerStatus::Stopped;
        Ok(())
    }

    pub fn resume(&mut self, now_ms: u64) -> Result<()> {
        if self.status != TimerStatus::Stopped {
            bail!("only a stopped stopwatch can be resumed");
        }
        self.segment = Some(Segment::at(now_ms));
        self.status = TimerStatus::Running;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        if self.status != TimerStatus::Stopped {
            bail!("stop the stopwatch before resetting it");
        }
        *self = Self::default();
        Ok(())
    }

    /// Duration displayed on lap row `number` (1 = oldest lap).
    pub fn lap_interval(&self, number: usize) -> Option<u64> {
        let count = self.laps.len();
        if number == 0 || number > count {
            return None;
        }
        let stored = self.laps[count - number];
        if number == count {
            Some(stored.saturating_add(self.live_delta_ms()))
        } else {
            Some(stored)
        }
    }

    pub fn lap_rows(&self) -> Vec<LapRow> {
        let count = self.laps.len();
        let completed = self.laps.get(1..).unwrap_or_default();
        let (fastest, slowest) = if completed.len() >= 2 {
            (completed.iter().min().copied(), completed.iter().max().copied())
        } else {
            (None, None)
        };

        (0..count)
            .map(|idx| {
                let number = count - idx;
                let current = idx == 0;
                let lap_ms = if current {
                    self.laps[idx].saturating_add(self.live_delta_ms())
                } else {
                    self.laps[idx]
                };
                LapRow {
                    number,
                    lap_ms,
                    display: format_elapsed(lap_ms),
                    current,
                    fastest: !current && fastest == Some(lap_ms),
                    slowest: !current && slowest == Some(lap_ms),
                }
            })
            .collect()
    }

    /// Moves the live reading to `now_ms` and returns the current lap's total.
    fn bank_segment(&mut self, now_ms: u64) -> u64 {
        self.tick(now_ms);
        self.laps[0].saturating_add(self.live_delta_ms())
    }

    fn segment_now(&self) -> u64 {
        self.segment.map(|segment| segment.now_ms).unwrap_or(0)
    }
}
