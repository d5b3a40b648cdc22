use std::time::Duration;
use std::time::Instant;

use tracing::debug;

use crate::world;
use crate::world::LiveSet;

/// Delay between two generations, adjustable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed {
    interval: Duration,

    /// How much `speed_up` and `slow_down` change `interval` by
    step: Duration,
}

impl Speed {
    pub const fn new(interval: Duration, step: Duration) -> Self {
        Self { interval, step }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Shorten the interval by one step, as long as it stays above zero.
    pub fn speed_up(&mut self) {
        if self.interval > self.step {
            self.interval -= self.step;
        }
    }

    pub fn slow_down(&mut self) {
        self.interval = self.interval.saturating_add(self.step);
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(50))
    }
}

/// Deadline of the next generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    next: Instant,
}

impl Ticker {
    pub fn start(now: Instant, speed: &Speed) -> Self {
        Self {
            next: now + speed.interval(),
        }
    }

    /// Time left before the next generation is due, zero once it is.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Schedule the next generation one interval after `done`, when the last one finished
    /// drawing. A generation that ran late never makes the following one due at once.
    pub fn reschedule(&mut self, done: Instant, speed: &Speed) {
        self.next = done + speed.interval();
    }

    /// Bring the deadline forward after the interval got shorter.
    pub fn hurry(&mut self, now: Instant, speed: &Speed) {
        self.next = self.next.min(now + speed.interval());
    }
}

/// The current generation, as held by the driver.
pub struct Simulation {
    live: LiveSet,
    generation: u64,
}

impl Simulation {
    pub fn new(seed: LiveSet) -> Self {
        Self {
            live: seed,
            generation: 0,
        }
    }

    pub fn live(&self) -> &LiveSet {
        &self.live
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.live.len()
    }

    /// Replace the current generation with the next one.
    pub fn advance(&mut self) {
        self.live = world::step(&self.live);
        self.generation += 1;

        debug!(
            generation = self.generation,
            population = self.live.len(),
            "advanced"
        );
    }
}
