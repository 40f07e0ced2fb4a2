//! Countdown timer for a timed test.
//!
//! [`CountdownTimer`] holds the remaining seconds and decides when expiry
//! fires. [`spawn_ticker`] is the periodic driver: it only emits ticks, so
//! pausing it never loses the remaining time.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing changed: paused, or already expired.
    Idle,
    /// One second elapsed, time remains.
    Running,
    /// The countdown just reached zero. Reported once.
    Expired,
}

/// How close the countdown is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    total_secs: u64,
    remaining_secs: u64,
    expired: bool,
}

impl CountdownTimer {
    pub fn start(duration_minutes: u64) -> Self {
        let total_secs = duration_minutes.saturating_mul(60);
        Self {
            total_secs,
            remaining_secs: total_secs,
            expired: false,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advance the countdown by one second if `active`.
    pub fn tick(&mut self, active: bool) -> TickOutcome {
        if !active || self.expired {
            return TickOutcome::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.expired = true;
            return TickOutcome::Expired;
        }

        TickOutcome::Running
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn fraction_remaining(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        self.remaining_secs as f64 / self.total_secs as f64
    }

    pub fn urgency(&self) -> Urgency {
        let percent = self.fraction_remaining() * 100.0;
        if percent < 10.0 {
            Urgency::Critical
        } else if percent < 25.0 {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

/// Format seconds as zero-padded `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Owns the ticker task and aborts it when dropped.
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Call `on_tick` once per second while `active` holds true.
///
/// Ticking stops as soon as the flag turns false and restarts a full period
/// after it turns true again. The task ends when `on_tick` returns false,
/// the flag's sender is dropped, or the handle is dropped.
pub fn spawn_ticker<F>(mut active: watch::Receiver<bool>, mut on_tick: F) -> TickerHandle
where
    F: FnMut() -> bool + Send + 'static,
{
    let task = tokio::spawn(async move {
        loop {
            if !*active.borrow_and_update() {
                if active.changed().await.is_err() {
                    return;
                }
                continue;
            }

            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    changed = active.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        if !*active.borrow_and_update() {
                            debug!("Ticker paused");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if !on_tick() {
                            return;
                        }
                    }
                }
            }
        }
    });

    TickerHandle { task }
}
