//! Immutable value timelines and their pure sampling function.
//!
//! A [`Timeline`] describes "go from `from` to `to` over `duration_ms`,
//! starting at `start_time_ms`, shaped by an easing curve". Sampling it at any
//! clock reading yields a [`TimelineSample`]; the same inputs always produce the
//! same sample, so the scheduler can sample as often as it likes.

use crate::easing::Easing;
use crate::error::{GaugeError, Result, ensure_finite};

#[derive(Clone, Debug)]
pub struct Timeline {
    from: f64,
    to: f64,
    duration_ms: f64,
    easing: Easing,
    start_time_ms: f64,
}

impl Timeline {
    /// Timeline starting at `0` with the default easing.
    ///
    /// `from`/`to` must be finite and `duration_ms` finite and non-negative.
    pub fn new(
        from: f64,
        to: f64,
        duration_ms: f64,
    ) -> Result<Self> {
        ensure_finite("from", from)?;
        ensure_finite("to", to)?;
        ensure_finite("duration_ms", duration_ms)?;
        if duration_ms < 0.0 {
            return Err(GaugeError::InvalidNumericInput { name: "duration_ms", value: duration_ms });
        }
        Ok(Self { from, to, duration_ms, easing: Easing::default(), start_time_ms: 0.0 })
    }

    /// Anchor the timeline at a clock reading.
    pub fn starting_at(
        self,
        start_time_ms: f64,
    ) -> Result<Self> {
        ensure_finite("start_time_ms", start_time_ms)?;
        Ok(Self { start_time_ms, ..self })
    }

    #[must_use]
    pub fn with_easing(
        self,
        easing: Easing,
    ) -> Self {
        Self { easing, ..self }
    }

    #[inline]
    pub const fn from(&self) -> f64 { self.from }

    #[inline]
    pub const fn to(&self) -> f64 { self.to }

    #[inline]
    pub const fn duration_ms(&self) -> f64 { self.duration_ms }

    #[inline]
    pub const fn start_time_ms(&self) -> f64 { self.start_time_ms }

    #[inline]
    pub const fn easing(&self) -> &Easing { &self.easing }

    /// Method form of [`sample_timeline`].
    #[inline]
    pub fn sample(
        &self,
        now_ms: f64,
    ) -> TimelineSample {
        sample_timeline(self, now_ms)
    }
}

/// Free-function form of [`Timeline::new`] + [`Timeline::starting_at`] + [`Timeline::with_easing`].
pub fn create_timeline(
    from: f64,
    to: f64,
    duration_ms: f64,
    easing: Easing,
    start_time_ms: f64,
) -> Result<Timeline> {
    Ok(Timeline::new(from, to, duration_ms)?.starting_at(start_time_ms)?.with_easing(easing))
}

/// A timeline evaluated at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineSample {
    pub elapsed_ms: f64,
    /// Linear progress, clamped to `[0, 1]`.
    pub progress: f64,
    /// Eased progress, clamped to `[0, 1]`.
    pub eased_progress: f64,
    pub value: f64,
    pub done: bool,
}

/// Evaluate `timeline` at `now_ms`.
///
/// Clock readings before the start count as zero elapsed time. Zero-duration
/// timelines are complete immediately.
pub fn sample_timeline(
    timeline: &Timeline,
    now_ms: f64,
) -> TimelineSample {
    let elapsed_ms = (now_ms - timeline.start_time_ms).max(0.0);
    let raw = if timeline.duration_ms == 0.0 { 1.0 } else { elapsed_ms / timeline.duration_ms };
    let progress = raw.clamp(0.0, 1.0);
    let eased_progress = timeline.easing.apply(progress).clamp(0.0, 1.0);
    let value = timeline.from + (timeline.to - timeline.from) * eased_progress;

    TimelineSample { elapsed_ms, progress, eased_progress, value, done: progress >= 1.0 }
}

// =============================================================================
// Unit Tests
// =============================================================================
