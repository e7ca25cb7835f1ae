//! Solver timing history and trail counters.
//!
//! History is feature-gated and runtime-toggled so it costs nothing when
//! disabled. [`SolverDiagnostics`] reports are independent of the feature and
//! always delivered when a diagnostics callback is installed.
//!
//! # Usage
//!
//! ```ignore
//! use roller_trails::metrics::{SolverMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! metrics.record_solve(elapsed_us, resolved, unresolved);
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::solver::SolverMode;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Fixed-size history, oldest value evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.buffer.iter().min()?;
        let max = self.buffer.iter().max()?;
        Some((*min, *max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128) // ~2 seconds at 60 steps per second
    }
}

/// Per-world solver and rope statistics.
#[derive(Debug, Clone, Default)]
pub struct SolverMetrics {
    // Timing
    /// Solver pass durations in microseconds.
    pub solve_timings: RollingWindow<u64>,
    pub last_solve_us: u64,

    // Queries
    /// Slots that received a result, cumulative.
    pub resolved_queries: u64,
    /// Pending slots left unresolved, cumulative.
    pub unresolved_queries: u64,

    // Ropes
    /// Full ropes continued into a fresh pool entry.
    pub rope_handoffs: u64,
    pub crossings: u64,
}

impl SolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the timing history and counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record one solver pass.
    pub fn record_solve(&mut self, timing_us: u64, resolved: usize, unresolved: usize) {
        if !is_enabled() {
            return;
        }
        self.solve_timings.push(timing_us);
        self.last_solve_us = timing_us;
        self.resolved_queries += resolved as u64;
        self.unresolved_queries += unresolved as u64;
    }

    pub fn record_handoff(&mut self) {
        if is_enabled() {
            self.rope_handoffs += 1;
        }
    }

    pub fn record_crossing(&mut self) {
        if is_enabled() {
            self.crossings += 1;
        }
    }

    pub fn avg_solve_timing_us(&self) -> f64 {
        self.solve_timings.average()
    }
}

/// Periodic report of how much wall time the solver consumed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverDiagnostics {
    /// Solver that produced the timings.
    pub mode: SolverMode,
    /// Time spent resolving queries during the window.
    pub solver_time: Duration,
    /// Length of the reporting window.
    pub window: Duration,
    /// `solver_time / window` as a percentage.
    pub share_percent: f64,
}

impl SolverDiagnostics {
    pub fn new(mode: SolverMode, solver_time: Duration, window: Duration) -> Self {
        let share_percent = if window.is_zero() {
            0.0
        } else {
            solver_time.as_secs_f64() / window.as_secs_f64() * 100.0
        };

        Self {
            mode,
            solver_time,
            window,
            share_percent,
        }
    }
}

impl std::fmt::Display for SolverDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.2} ms of {:.2} ms ({:.1}%)",
            self.mode,
            self.solver_time.as_secs_f64() * 1000.0,
            self.window.as_secs_f64() * 1000.0,
            self.share_percent
        )
    }
}
