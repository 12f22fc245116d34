//! Simulated clock.
//!
//! [`SimClock`] is a two-state machine (`Stopped`, `Running`) over a virtual
//! millisecond offset. Each tick advances the offset by
//! `tick_period × speed_multiplier` and reports an hour change only when the
//! derived hour differs from the last one reported.
//!
//! Every transition that stops or restarts the tick stream bumps the clock's
//! generation. [`ClockDriver`] stamps its ticks with the generation it was
//! spawned for, so ticks still queued after a pause are recognised as stale
//! and dropped.

use std::time::Duration;

use evl_core::HourOfDay;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::intent::Intent;

/// Tick pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSettings {
    pub tick_period: Duration,
    pub speed_multiplier: u64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(10),
            speed_multiplier: 1000,
        }
    }
}

/// Largest advance per tick that still crosses at most one hour boundary.
pub const MAX_ADVANCE_PER_TICK_MS: u64 = 3_600_000;

impl ClockSettings {
    /// Virtual milliseconds added per tick.
    pub fn advance_per_tick(&self) -> u64 {
        (self.tick_period.as_millis() as u64).saturating_mul(self.speed_multiplier)
    }

    /// A tick may report only one hour change, so it must not skip an hour.
    pub fn crosses_at_most_one_hour(&self) -> bool {
        self.advance_per_tick() <= MAX_ADVANCE_PER_TICK_MS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Stopped,
    Running,
}

/// Result of an accepted tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub offset_ms: u64,
    /// Set only when the derived hour moved.
    pub hour_changed: Option<HourOfDay>,
}

#[derive(Debug, Clone)]
pub struct SimClock {
    settings: ClockSettings,
    offset_ms: u64,
    state: ClockState,
    last_hour: Option<HourOfDay>,
    generation: u64,
}

impl SimClock {
    pub fn new(settings: ClockSettings) -> Self {
        Self {
            settings,
            offset_ms: 0,
            state: ClockState::Stopped,
            last_hour: None,
            generation: 0,
        }
    }

    /// `Stopped → Running`. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.state == ClockState::Running {
            return false;
        }
        self.state = ClockState::Running;
        self.generation += 1;
        true
    }

    /// `Running → Stopped`. Returns `false` if already stopped.
    pub fn pause(&mut self) -> bool {
        if self.state == ClockState::Stopped {
            return false;
        }
        self.state = ClockState::Stopped;
        self.generation += 1;
        true
    }

    /// Stop, zero the offset and report hour 0 unconditionally.
    pub fn reset(&mut self) -> HourOfDay {
        self.state = ClockState::Stopped;
        self.generation += 1;
        self.offset_ms = 0;
        self.last_hour = Some(HourOfDay::MIDNIGHT);
        HourOfDay::MIDNIGHT
    }

    /// Advance one tick if running and `generation` is current.
    ///
    /// Returns `None` for ticks that arrive while stopped or that belong to
    /// an earlier run.
    pub fn tick(&mut self, generation: u64) -> Option<TickOutcome> {
        if self.state != ClockState::Running || generation != self.generation {
            return None;
        }
        self.offset_ms = self
            .offset_ms
            .saturating_add(self.settings.advance_per_tick());
        let hour = self.hour();
        let hour_changed = (self.last_hour != Some(hour)).then_some(hour);
        self.last_hour = Some(hour);
        Some(TickOutcome {
            offset_ms: self.offset_ms,
            hour_changed,
        })
    }

    pub fn hour(&self) -> HourOfDay {
        HourOfDay::from_offset_millis(self.offset_ms)
    }

    pub fn offset_ms(&self) -> u64 {
        self.offset_ms
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> ClockSettings {
        self.settings
    }
}

/// Periodic tick source feeding [`Intent::Tick`] into the controller's
/// intent channel.
///
/// Each `spawn` starts a fresh interval; nothing carries over from a
/// previous run.
#[derive(Debug)]
pub struct ClockDriver {
    period: Duration,
    intents: UnboundedSender<Intent>,
    task: Option<JoinHandle<()>>,
}

impl ClockDriver {
    pub fn new(period: Duration, intents: UnboundedSender<Intent>) -> Self {
        Self {
            period,
            intents,
            task: None,
        }
    }

    /// Start ticking for `generation`, replacing any running task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&mut self, generation: u64) {
        self.stop();
        let period = self.period;
        let intents = self.intents.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if intents.send(Intent::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(generation, period_ms = period.as_millis() as u64, "clock driver started");
    }

    /// Abort the tick task. No tick is sent after this returns.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("clock driver stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ClockDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> SimClock {
        SimClock::new(ClockSettings::default())
    }

    fn hour(h: u8) -> HourOfDay {
        HourOfDay::new(h).unwrap()
    }

    #[test]
    fn test_transitions() {
        let mut c = clock();
        assert_eq!(c.state(), ClockState::Stopped);
        assert!(c.start());
        assert!(!c.start());
        assert!(c.is_running());
        assert!(c.pause());
        assert!(!c.pause());
        assert_eq!(c.state(), ClockState::Stopped);
    }

    #[test]
    fn test_tick_advances_by_period_times_multiplier() {
        let mut c = clock();
        c.start();
        let g = c.generation();
        let out = c.tick(g).unwrap();
        assert_eq!(out.offset_ms, 10_000);
        c.tick(g);
        assert_eq!(c.offset_ms(), 20_000);
    }

    #[test]
    fn test_offset_is_monotonic_while_running() {
        let mut c = clock();
        c.start();
        let g = c.generation();
        let mut previous = c.offset_ms();
        for _ in 0..1000 {
            c.tick(g);
            assert!(c.offset_ms() >= previous);
            previous = c.offset_ms();
        }
    }

    #[test]
    fn test_hour_change_is_edge_triggered() {
        let mut c = clock();
        c.reset();
        c.start();
        let g = c.generation();

        // 360 ticks of 10 s each make exactly one hour.
        let changes: Vec<HourOfDay> = (0..360).filter_map(|_| c.tick(g)?.hour_changed).collect();
        assert_eq!(changes, vec![hour(1)]);

        let changes: Vec<HourOfDay> = (0..359).filter_map(|_| c.tick(g)?.hour_changed).collect();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_one_notification_per_boundary() {
        let mut c = SimClock::new(ClockSettings {
            tick_period: Duration::from_millis(10),
            speed_multiplier: 180_000,
        });
        c.reset();
        c.start();
        let g = c.generation();
        // Half an hour per tick: 48 ticks cover a full day and wrap.
        let changes: Vec<u8> = (0..48)
            .filter_map(|_| c.tick(g)?.hour_changed)
            .map(HourOfDay::value)
            .collect();
        let expected: Vec<u8> = (1..24).chain(std::iter::once(0)).collect();
        assert_eq!(changes, expected);
    }

    #[test]
    fn test_one_hour_per_tick_still_reports_every_hour() {
        let settings = ClockSettings {
            tick_period: Duration::from_millis(10),
            speed_multiplier: 360_000,
        };
        assert!(settings.crosses_at_most_one_hour());
        assert!(!ClockSettings {
            speed_multiplier: 360_001,
            ..settings
        }
        .crosses_at_most_one_hour());

        let mut c = SimClock::new(settings);
        c.reset();
        c.start();
        let g = c.generation();
        let changes: Vec<u8> = (0..24)
            .filter_map(|_| c.tick(g)?.hour_changed)
            .map(HourOfDay::value)
            .collect();
        let expected: Vec<u8> = (1..24).chain(std::iter::once(0)).collect();
        assert_eq!(changes, expected);
    }

    #[test]
    fn test_reset_zeroes_and_reports_midnight() {
        let mut c = clock();
        c.start();
        let g = c.generation();
        for _ in 0..500 {
            c.tick(g);
        }
        assert!(c.offset_ms() > 0);
        assert_eq!(c.reset(), HourOfDay::MIDNIGHT);
        assert_eq!(c.offset_ms(), 0);
        assert!(!c.is_running());
        // Already at hour 0: reset still reports it.
        assert_eq!(c.reset(), HourOfDay::MIDNIGHT);
    }

    #[test]
    fn test_stale_and_stopped_ticks_are_ignored() {
        let mut c = clock();
        assert!(c.tick(c.generation()).is_none());

        c.start();
        let old = c.generation();
        c.pause();
        c.start();
        assert!(c.tick(old).is_none());
        assert_eq!(c.offset_ms(), 0);
        assert!(c.tick(c.generation()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_sends_ticks_until_stopped() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut driver = ClockDriver::new(Duration::from_millis(10), tx);
        driver.spawn(7);
        assert!(driver.is_active());

        tokio::time::sleep(Duration::from_millis(35)).await;
        let mut received = Vec::new();
        while let Ok(intent) = rx.try_recv() {
            received.push(intent);
        }
        assert_eq!(received.len(), 3);
        assert!(received
            .iter()
            .all(|i| matches!(i, Intent::Tick { generation: 7 })));

        driver.stop();
        assert!(!driver.is_active());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
