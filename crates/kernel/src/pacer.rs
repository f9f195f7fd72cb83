use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::error::PacerError;

const NANOS_PER_MS: f64 = 1_000_000.0;

/// Time source for the frame pacer.
pub trait Clock {
    /// Nanoseconds since a fixed origin, or `None` if the clock cannot be
    /// read.
    fn now_ns(&self) -> Option<u64>;

    /// Coarse wait, used while more than a millisecond remains.
    fn sleep(&self, duration: Duration);

    /// Fine wait step, used for the last millisecond before a boundary.
    fn spin(&self) {
        std::hint::spin_loop();
    }
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ns(&self) -> Option<u64> {
        u64::try_from(self.origin.elapsed().as_nanos()).ok()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Hand-driven clock. Sleeping and spinning advance it; clones share the
/// same time so a test can hold a handle while the pacer owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
    broken: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock whose every read fails.
    pub fn unavailable() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.now
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now.fetch_add((ms * NANOS_PER_MS) as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> Option<u64> {
        (!self.broken).then(|| self.now.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }

    fn spin(&self) {
        self.advance(Duration::from_micros(50));
    }
}

/// Ring buffer of recent frame deltas, in milliseconds.
#[derive(Debug, Clone)]
pub struct FrameStats {
    history: Vec<f64>,
    index: usize,
    filled: bool,
}

impl FrameStats {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![0.0; capacity.max(1)],
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt_ms: f64) {
        self.history[self.index] = dt_ms;
        self.index = (self.index + 1) % self.history.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    /// Number of deltas the ring holds once full.
    pub fn capacity(&self) -> usize {
        self.history.len()
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.history.len()
        } else {
            self.index
        }
    }

    fn samples(&self) -> &[f64] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> f64 {
        let samples = self.samples();
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    pub fn max(&self) -> f64 {
        self.samples().iter().copied().fold(0.0, f64::max)
    }

    pub fn min(&self) -> f64 {
        let samples = self.samples();
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}

/// Produces a capped, monotonic per-frame delta at a target rate.
///
/// Waiting is a coarse 1 ms sleep while more than a millisecond remains,
/// then a spin until the boundary. Long frames are truncated to
/// `max_delta_ms`, never sub-stepped.
#[derive(Debug)]
pub struct FramePacer<C: Clock = MonotonicClock> {
    clock: C,
    started: bool,
    start_ns: u64,
    prev_ns: u64,
    elapsed_frame_ns: u64,
    period_ns: u64,
    frame_count: u64,
    max_delta_ms: f64,
    stats: FrameStats,
}

impl Default for FramePacer<MonotonicClock> {
    fn default() -> Self {
        Self::with_clock(MonotonicClock::default())
    }
}

impl<C: Clock> FramePacer<C> {
    /// A stopped pacer reading from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            started: false,
            start_ns: 0,
            prev_ns: 0,
            elapsed_frame_ns: 0,
            period_ns: 0,
            frame_count: 0,
            max_delta_ms: 0.0,
            stats: FrameStats::default(),
        }
    }

    pub fn with_stats_window(mut self, capacity: usize) -> Self {
        self.set_stats_window(capacity);
        self
    }

    /// Resize the statistics ring, discarding recorded deltas.
    pub fn set_stats_window(&mut self, capacity: usize) {
        self.stats = FrameStats::new(capacity);
    }

    /// Record the baseline and frame period. A `target_rate` of 0 means
    /// unlimited; a non-positive `max_delta_ms` disables clamping.
    pub fn start(&mut self, target_rate: u32, max_delta_ms: f64) -> Result<(), PacerError> {
        let now = self.clock.now_ns().ok_or(PacerError::ClockUnavailable)?;
        self.start_ns = now;
        self.prev_ns = now;
        self.elapsed_frame_ns = 0;
        self.period_ns = if target_rate > 0 {
            (1000.0 / f64::from(target_rate) * NANOS_PER_MS) as u64
        } else {
            0
        };
        self.frame_count = 0;
        self.max_delta_ms = max_delta_ms;
        self.started = true;
        tracing::info!(target_rate, max_delta_ms, "frame pacer started");
        Ok(())
    }

    /// Idempotent; safe on a pacer that was never started.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        tracing::info!(frames = self.frame_count, "frame pacer stopped");
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Block until the next frame boundary, then record the delta since the
    /// previous boundary.
    pub fn wait_for_next_frame(&mut self) -> Result<(), PacerError> {
        if !self.started {
            return Err(PacerError::NotStarted);
        }
        let next = self.prev_ns + self.period_ns;
        let mut now = self.now()?;
        while now < next {
            if next - now > NANOS_PER_MS as u64 {
                self.clock.sleep(Duration::from_millis(1));
            } else {
                self.clock.spin();
            }
            now = self.now()?;
        }
        self.elapsed_frame_ns = now.saturating_sub(self.prev_ns);
        self.prev_ns = now;
        self.frame_count += 1;
        self.stats.record(self.elapsed_frame_ms());
        tracing::trace!(
            frame = self.frame_count,
            dt_ms = self.elapsed_frame_ms(),
            "frame boundary"
        );
        Ok(())
    }

    fn now(&self) -> Result<u64, PacerError> {
        self.clock.now_ns().ok_or(PacerError::ClockUnavailable)
    }

    /// Raw, unclamped delta of the last frame.
    pub fn raw_frame_time_ms(&self) -> f64 {
        self.elapsed_frame_ns as f64 / NANOS_PER_MS
    }

    /// Delta of the last frame, clamped to `max_delta_ms`.
    pub fn elapsed_frame_time_ms(&self) -> f64 {
        self.elapsed_frame_ms()
    }

    fn elapsed_frame_ms(&self) -> f64 {
        let raw = self.raw_frame_time_ms();
        if self.max_delta_ms > 0.0 && raw > self.max_delta_ms {
            self.max_delta_ms
        } else {
            raw
        }
    }

    /// Milliseconds since `start`, or 0 when stopped.
    pub fn elapsed_time_ms(&self) -> f64 {
        if !self.started {
            return 0.0;
        }
        let now = self.clock.now_ns().unwrap_or(self.prev_ns);
        now.saturating_sub(self.start_ns) as f64 / NANOS_PER_MS
    }

    /// Frames per second up to the last recorded boundary.
    pub fn current_fps(&self) -> f64 {
        let secs = self.prev_ns.saturating_sub(self.start_ns) as f64 / 1e9;
        if secs <= 0.0 {
            0.0
        } else {
            self.frame_count as f64 / secs
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}
