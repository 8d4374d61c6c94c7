use std::time::{Duration, Instant};

/// Where the backup timer stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupState {
    Idle,
    DueForSave,
}

/// Decides when the document is written to its snapshot file.
///
/// Driven purely by elapsed time since the last attempt, never by request
/// traffic. The caller checks it on every loop iteration.
#[derive(Debug, Clone)]
pub struct BackupSchedule {
    interval: Duration,
    last_attempt: Instant,
}

impl BackupSchedule {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_attempt: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self, now: Instant) -> BackupState {
        if now.saturating_duration_since(self.last_attempt) >= self.interval {
            BackupState::DueForSave
        } else {
            BackupState::Idle
        }
    }

    /// Returns true when a save is due, and restarts the interval from
    /// `now`. The caller must attempt the save; a failed attempt still
    /// counts.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state(now) {
            BackupState::DueForSave => {
                self.last_attempt = now;
                true
            }
            BackupState::Idle => false,
        }
    }
}
