//! Time sources.
//!
//! The game runs on two independent clocks:
//!
//! - The **frame clock** feeds a [`FrameTimer`], whose per-frame delta scales
//!   every movement (ships, bullets, drifters, enemies).
//! - The **wall clock** drives [`Cadence`]s: enemy volleys, explosion
//!   animation frames and background scrolling. These fire on real elapsed
//!   time and do not scale with the frame delta.
//!
//! Both are injected as [`TimeSource`]s, so tests drive them with a
//! [`ManualClock`] and the terminal frontend uses [`SystemClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// A monotonic clock measured from an arbitrary origin.
pub trait TimeSource {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Real monotonic time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Starts a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock. Clones share the same reading.
///
/// ```
/// use std::time::Duration;
/// use duelwing_core::time::{ManualClock, TimeSource};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.advance(Duration::from_millis(16));
/// assert_eq!(clock.now(), Duration::from_millis(16));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Sets the clock reading.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Measures the delta between consecutive frames and the frame rate.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last: Option<Duration>,
    elapsed: f32,
    window_start: Duration,
    window_frames: u32,
    frame_rate: u32,
}

impl FrameTimer {
    /// Creates a timer that has not ticked yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame at `now` and returns seconds since the previous one.
    ///
    /// The first tick returns zero. The frame rate is recomputed once per
    /// second of clock time.
    pub fn tick(&mut self, now: Duration) -> f32 {
        let Some(last) = self.last.replace(now) else {
            self.window_start = now;
            self.elapsed = 0.0;
            return 0.0;
        };
        self.elapsed = now.saturating_sub(last).as_secs_f32();

        self.window_frames += 1;
        let window = now.saturating_sub(self.window_start);
        if window >= Duration::from_secs(1) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rate = (f64::from(self.window_frames) / window.as_secs_f64()).round() as u32;
            self.frame_rate = rate;
            self.window_frames = 0;
            self.window_start = now;
        }
        self.elapsed
    }

    /// Seconds between the last two ticks.
    #[must_use]
    pub const fn time_elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Frames per second over the last complete one-second window.
    #[must_use]
    pub const fn frame_rate(&self) -> u32 {
        self.frame_rate
    }
}

/// Fires at most once per `interval` of wall-clock time.
///
/// ```
/// use std::time::Duration;
/// use duelwing_core::time::Cadence;
///
/// let mut volley = Cadence::new(Duration::from_secs(2), Duration::ZERO);
/// assert!(!volley.ready(Duration::from_millis(1500)));
/// assert!(volley.ready(Duration::from_secs(2)));
/// assert!(!volley.ready(Duration::from_millis(2100)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    interval: Duration,
    last: Duration,
}

impl Cadence {
    /// Creates a cadence whose first firing is `interval` after `start`.
    #[must_use]
    pub const fn new(interval: Duration, start: Duration) -> Self {
        Self {
            interval,
            last: start,
        }
    }

    /// Returns `true` and restarts the interval if it has elapsed by `now`.
    pub fn ready(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// Restarts the interval at `now`.
    pub fn reset(&mut self, now: Duration) {
        self.last = now;
    }

    /// Configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}
