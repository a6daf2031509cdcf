//! Recurring tick timer for the interactive loop.
//!
//! The simulation only reports its tick rate; this owns the timer and
//! re-creates it whenever the rate changes.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Period between ticks at `rate` ticks per second
pub fn period(rate: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(rate.max(1)))
}

pub struct TickScheduler {
    interval: Interval,
    rate: u32,
    paused: bool,
}

impl TickScheduler {
    pub fn new(rate: u32) -> Self {
        Self {
            interval: Self::build(rate),
            rate,
            paused: false,
        }
    }

    fn build(rate: u32) -> Interval {
        let period = period(rate);
        // First tick one full period from now, not immediately
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn is_running(&self) -> bool {
        !self.paused
    }

    /// Replace the timer if the rate changed; returns whether it did
    pub fn set_rate(&mut self, rate: u32) -> bool {
        if rate == self.rate {
            return false;
        }
        self.rate = rate;
        self.interval = Self::build(rate);
        true
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Restart ticking at the last rate, one period from now
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.interval = Self::build(self.rate);
        }
    }

    /// Hold the next tick back by `delay`, then continue at the current rate
    pub fn delay(&mut self, delay: Duration) {
        self.interval.reset_after(delay);
    }

    /// Wait for the next tick. Never completes while paused.
    pub async fn tick(&mut self) -> Instant {
        if self.paused {
            std::future::pending().await
        } else {
            self.interval.tick().await
        }
    }
}
