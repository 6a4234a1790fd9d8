use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

pub const MIN_TICK_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchSettings {
    /// How often the display refreshes while the stopwatch runs.
    pub tick_interval_ms: u64,
}

impl Default for StopwatchSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
        }
    }
}

impl StopwatchSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            bail!(
                "tick interval must be at least {MIN_TICK_INTERVAL_MS}ms, got {}ms",
                self.tick_interval_ms
            );
        }
        Ok(())
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<StopwatchSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<StopwatchSettings>(&contents) {
                Ok(settings) if settings.validate().is_ok() => settings,
                _ => {
                    warn!(
                        "Ignoring invalid settings at {}; using defaults",
                        path.display()
                    );
                    StopwatchSettings::default()
                }
            }
        } else {
            StopwatchSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn stopwatch(&self) -> StopwatchSettings {
        self.read().clone()
    }

    pub fn update_stopwatch(&self, settings: StopwatchSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &StopwatchSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, StopwatchSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, StopwatchSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
