//! Major/minor tick generation over a numeric range.
//!
//! Ticks carry both their domain value and their normalized position, so every
//! gauge kind (arcs, bars, compass roses) can place them without re-deriving
//! the scale.
//!
//! # Layout
//!
//! Majors are spaced evenly so the first lands on `min` and the last on `max`.
//! Minor ticks sit between each pair of consecutive majors, emitted directly
//! after the major they follow. No minors follow the last major.
//!
//! ```text
//! 0 . 25 . 50 . 75 . 100      (5 majors, 1 minor per major)
//! M m  M m  M m  M m  M
//! ```

use crate::error::{GaugeError, Result};
use crate::geometry::{NumericRange, normalize};

/// Upper bound on generated ticks. Larger requests are rejected up front.
pub const MAX_TICKS: u64 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickKind {
    Major,
    Minor,
}

/// One tick mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// `value` normalized into the range, unclamped.
    pub position: f64,
    pub kind: TickKind,
}

/// Tick generator options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOptions {
    /// Number of major ticks, at least 2.
    pub major_tick_count: u32,
    /// Minor ticks between consecutive majors.
    pub minor_ticks_per_major: u32,
    /// When false the first and last major tick are left out.
    pub include_bounds: bool,
}

impl Default for TickOptions {
    fn default() -> Self { Self { major_tick_count: 5, minor_ticks_per_major: 1, include_bounds: true } }
}

impl TickOptions {
    /// Build options from loosely typed counts (e.g. parsed JSON numbers).
    ///
    /// Rejects non-finite, negative or fractional counts with
    /// [`GaugeError::InvalidTickOptions`].
    pub fn from_counts(
        major_tick_count: f64,
        minor_ticks_per_major: f64,
        include_bounds: bool,
    ) -> Result<Self> {
        Ok(Self {
            major_tick_count: whole_count("major_tick_count", major_tick_count)?,
            minor_ticks_per_major: whole_count("minor_ticks_per_major", minor_ticks_per_major)?,
            include_bounds,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.major_tick_count < 2 {
            return Err(GaugeError::InvalidTickOptions {
                reason: format!("major_tick_count must be at least 2, got {}", self.major_tick_count),
            });
        }
        let total = u64::from(self.major_tick_count)
            + u64::from(self.major_tick_count - 1) * u64::from(self.minor_ticks_per_major);
        if total > MAX_TICKS {
            return Err(GaugeError::InvalidTickOptions {
                reason: format!("{total} ticks requested, limit is {MAX_TICKS}"),
            });
        }
        Ok(())
    }
}

fn whole_count(
    name: &str,
    count: f64,
) -> Result<u32> {
    if !count.is_finite() || count < 0.0 || count.fract() != 0.0 || count > f64::from(u32::MAX) {
        return Err(GaugeError::InvalidTickOptions {
            reason: format!("{name} must be a non-negative integer, got {count}"),
        });
    }
    Ok(count as u32)
}

/// Generate the tick sequence for `range`.
///
/// Output is ordered by value. Fails with [`GaugeError::InvalidTickOptions`]
/// when fewer than two majors are requested or the tick count exceeds
/// [`MAX_TICKS`].
pub fn generate_ticks(
    range: &NumericRange,
    options: &TickOptions,
) -> Result<Vec<Tick>> {
    options.validate()?;

    let majors = options.major_tick_count;
    let minors = options.minor_ticks_per_major;
    let major_step = range.span() / f64::from(majors - 1);
    let minor_step = major_step / f64::from(minors + 1);

    let capacity = majors as usize + (majors as usize - 1) * minors as usize;
    let mut ticks = Vec::with_capacity(capacity);
    let tick = |value: f64, kind: TickKind| Tick { value, position: normalize(value, range, false), kind };

    for i in 0..majors {
        // Last major is pinned to max to avoid accumulated rounding
        let major_value = if i == majors - 1 { range.max() } else { range.min() + f64::from(i) * major_step };
        let is_bound = i == 0 || i == majors - 1;
        if options.include_bounds || !is_bound {
            ticks.push(tick(major_value, TickKind::Major));
        }
        if i < majors - 1 {
            for m in 1..=minors {
                ticks.push(tick(major_value + f64::from(m) * minor_step, TickKind::Minor));
            }
        }
    }

    Ok(ticks)
}

// =============================================================================
// Unit Tests
// =============================================================================
