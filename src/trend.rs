//! Directional trend of a reading over a trailing time window.
//!
//! Each gauge keeps a [`ValueHistory`] of recent `(timestamp, value)` samples.
//! [`calculate_trend`] looks at the window ending at the newest sample and
//! compares its first and last values:
//!
//! - `|last - first| < threshold` → [`Trend::Steady`]
//! - `last > first` → [`Trend::Up`]
//! - otherwise → [`Trend::Down`]
//!
//! Fewer than two usable samples means no trend at all (`None`), which the
//! renderer shows as no arrow.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_TREND_THRESHOLD, DEFAULT_TREND_WINDOW_MS, HISTORY_SIZE};
use crate::error::{GaugeError, Result};

/// One recorded reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendSample {
    /// Milliseconds on the gauge's clock.
    pub timestamp: f64,
    pub value: f64,
}

impl TrendSample {
    pub const fn new(
        timestamp: f64,
        value: f64,
    ) -> Self {
        Self { timestamp, value }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trend {
    Up,
    Down,
    Steady,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendOptions {
    /// Minimum absolute change that counts as movement.
    pub threshold: f64,
    /// Length of the trailing window in milliseconds.
    pub window_ms: f64,
}

impl Default for TrendOptions {
    fn default() -> Self { Self { threshold: DEFAULT_TREND_THRESHOLD, window_ms: DEFAULT_TREND_WINDOW_MS } }
}

impl TrendOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(GaugeError::InvalidTrendOptions {
                reason: format!("threshold must be finite and >= 0, got {}", self.threshold),
            });
        }
        if !self.window_ms.is_finite() || self.window_ms <= 0.0 {
            return Err(GaugeError::InvalidTrendOptions {
                reason: format!("window_ms must be finite and > 0, got {}", self.window_ms),
            });
        }
        Ok(())
    }
}

/// Classify the trend of `samples`.
///
/// Samples may arrive in any order; non-finite entries are ignored.
pub fn calculate_trend(
    samples: &[TrendSample],
    options: &TrendOptions,
) -> Result<Option<Trend>> {
    options.validate()?;

    let mut finite: Vec<TrendSample> =
        samples.iter().copied().filter(|s| s.timestamp.is_finite() && s.value.is_finite()).collect();
    if finite.len() < 2 {
        return Ok(None);
    }
    finite.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    let Some(latest) = finite.last().map(|s| s.timestamp) else { return Ok(None) };
    let window_start = latest - options.window_ms;
    let in_window: Vec<&TrendSample> = finite.iter().filter(|s| s.timestamp >= window_start).collect();

    let (Some(first), Some(last)) = (in_window.first(), in_window.last()) else { return Ok(None) };
    if in_window.len() < 2 {
        return Ok(None);
    }

    let delta = last.value - first.value;
    Ok(Some(if delta.abs() < options.threshold {
        Trend::Steady
    } else if delta > 0.0 {
        Trend::Up
    } else {
        Trend::Down
    }))
}

// =============================================================================
// Value History
// =============================================================================

/// Bounded FIFO of recent readings, oldest evicted first.
#[derive(Clone, Debug)]
pub struct ValueHistory {
    samples: VecDeque<TrendSample>,
    capacity: usize,
}

impl ValueHistory {
    pub fn new() -> Self { Self::with_capacity(HISTORY_SIZE) }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self { samples: VecDeque::with_capacity(capacity), capacity }
    }

    /// Record a reading, evicting the oldest when full.
    pub fn push(
        &mut self,
        timestamp: f64,
        value: f64,
    ) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(TrendSample::new(timestamp, value));
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<TrendSample> { self.samples.back().copied() }

    /// Samples in insertion order.
    pub fn samples(&self) -> Vec<TrendSample> { self.samples.iter().copied().collect() }

    pub fn trend(
        &self,
        options: &TrendOptions,
    ) -> Result<Option<Trend>> {
        let (front, back) = self.samples.as_slices();
        if back.is_empty() {
            calculate_trend(front, options)
        } else {
            calculate_trend(&self.samples(), options)
        }
    }

    pub fn clear(&mut self) { self.samples.clear(); }

    #[inline]
    pub fn len(&self) -> usize { self.samples.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    #[inline]
    pub const fn capacity(&self) -> usize { self.capacity }
}

impl Default for ValueHistory {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
