//! Numeric ranges and the value → fraction → angle → pixel conversions.
//!
//! Everything here is pure and stateless. Gauge renderers chain these helpers to
//! turn a domain value (a temperature, a heading, a pressure) into screen
//! coordinates:
//!
//! ```text
//! value --normalize--> fraction [0,1] --denormalize--> angle / pixel offset
//!                                             |
//!                                   polar_to_cartesian --> Point2
//! ```
//!
//! # Angle Convention
//!
//! Angles are radians in screen space: `0` points to 3 o'clock and positive
//! angles turn clockwise, because the y axis grows downwards. A classic
//! 270° speedometer scale starting at 7:30 is therefore
//! `ArcSpan::from_degrees(135.0, 270.0)`.

use embedded_graphics::prelude::Point;
use serde::{Deserialize, Serialize};

use crate::error::{GaugeError, Result, ensure_finite};

// =============================================================================
// Numeric Range
// =============================================================================

/// Closed numeric interval with `min < max`, both finite.
///
/// Constructed through [`NumericRange::new`] only, so holding one is proof the
/// invariant was checked.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NumericRange {
    min: f64,
    max: f64,
}

impl NumericRange {
    /// Validate and build a range.
    ///
    /// Fails with [`GaugeError::InvalidRange`] when either bound is non-finite
    /// or `max <= min`.
    pub fn new(
        min: f64,
        max: f64,
    ) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(GaugeError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub const fn min(&self) -> f64 { self.min }

    #[inline]
    pub const fn max(&self) -> f64 { self.max }

    /// Distance between the bounds (always positive).
    #[inline]
    pub fn span(&self) -> f64 { self.max - self.min }

    #[inline]
    pub fn contains(
        &self,
        value: f64,
    ) -> bool {
        value >= self.min && value <= self.max
    }

    #[inline]
    pub fn clamp(
        &self,
        value: f64,
    ) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// The unit interval, used as the target of fraction conversions.
pub const UNIT_RANGE: NumericRange = NumericRange { min: 0.0, max: 1.0 };

impl<'de> Deserialize<'de> for NumericRange {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            min: f64,
            max: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.min, raw.max).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Fraction Conversions
// =============================================================================

/// Map `value` into its fraction of `range`.
///
/// With `clamp_to_range` the value is clamped into the range first, so the
/// result stays in `[0, 1]`. Without it, off-scale values produce fractions
/// below 0 or above 1.
#[inline]
pub fn normalize(
    value: f64,
    range: &NumericRange,
    clamp_to_range: bool,
) -> f64 {
    let value = if clamp_to_range { range.clamp(value) } else { value };
    (value - range.min) / range.span()
}

/// Inverse of [`normalize`]: map a fraction back into `range`.
///
/// `clamp_to_unit` clamps the fraction into `[0, 1]` before scaling.
#[inline]
pub fn denormalize(
    fraction: f64,
    range: &NumericRange,
    clamp_to_unit: bool,
) -> f64 {
    let fraction = if clamp_to_unit { fraction.clamp(0.0, 1.0) } else { fraction };
    range.min + fraction * range.span()
}

/// Re-express `value` from one range in another (normalize, then denormalize).
#[inline]
pub fn map_range(
    value: f64,
    from: &NumericRange,
    to: &NumericRange,
    clamp: bool,
) -> f64 {
    denormalize(normalize(value, from, clamp), to, clamp)
}

// =============================================================================
// Angles
// =============================================================================

/// Angular extent of a scale: where it starts and how far it sweeps (radians).
///
/// Sweeps may be negative (counter-clockwise scales), which is why this is not
/// a [`NumericRange`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSpan {
    pub start: f64,
    pub sweep: f64,
}

impl ArcSpan {
    /// Build a span from degrees, validating that both numbers are finite and
    /// the sweep is non-zero.
    pub fn from_degrees(
        start_deg: f64,
        sweep_deg: f64,
    ) -> Result<Self> {
        ensure_finite("start_angle", start_deg)?;
        ensure_finite("sweep", sweep_deg)?;
        if sweep_deg == 0.0 {
            return Err(GaugeError::InvalidNumericInput { name: "sweep", value: sweep_deg });
        }
        Ok(Self { start: start_deg.to_radians(), sweep: sweep_deg.to_radians() })
    }

    /// Angle at `fraction` of the sweep (no clamping).
    #[inline]
    pub fn angle_at(
        &self,
        fraction: f64,
    ) -> f64 {
        self.start + fraction * self.sweep
    }

    #[inline]
    pub fn end(&self) -> f64 { self.start + self.sweep }
}

/// Angle (radians) of `value` on a scale covering `range` along `arc`.
#[inline]
pub fn value_to_angle(
    value: f64,
    range: &NumericRange,
    arc: &ArcSpan,
    clamp: bool,
) -> f64 {
    arc.angle_at(normalize(value, range, clamp))
}

/// Shortest angular distance between two headings in degrees (`0..=180`).
///
/// Wrap-around aware: `359°` and `1°` are `2°` apart.
#[inline]
pub fn angular_distance_deg(
    a: f64,
    b: f64,
) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

// =============================================================================
// Cartesian Points
// =============================================================================

/// Sub-pixel screen coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self { x, y }
    }

    /// Round to the nearest pixel.
    #[inline]
    pub fn to_point(self) -> Point { Point::new(self.x.round() as i32, self.y.round() as i32) }
}

impl From<Point> for Point2 {
    fn from(p: Point) -> Self { Self::new(f64::from(p.x), f64::from(p.y)) }
}

/// Point at `radius` from `center` in direction `angle` (radians, clockwise).
///
/// Fails with [`GaugeError::InvalidNumericInput`] for a negative or non-finite
/// radius, or a non-finite angle or center.
pub fn polar_to_cartesian(
    center: Point2,
    radius: f64,
    angle: f64,
) -> Result<Point2> {
    ensure_finite("radius", radius)?;
    if radius < 0.0 {
        return Err(GaugeError::InvalidNumericInput { name: "radius", value: radius });
    }
    ensure_finite("angle", angle)?;
    ensure_finite("center.x", center.x)?;
    ensure_finite("center.y", center.y)?;
    Ok(Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn range(
        min: f64,
        max: f64,
    ) -> NumericRange {
        NumericRange::new(min, max).unwrap()
    }

    // -------------------------------------------------------------------------
    // Range Construction Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_range_rejects_inverted_and_empty_bounds() {
        assert!(matches!(NumericRange::new(10.0, 0.0), Err(GaugeError::InvalidRange { .. })));
        assert!(NumericRange::new(5.0, 5.0).is_err(), "max == min is not a range");
    }

    #[test]
    fn test_range_rejects_non_finite_bounds() {
        assert!(NumericRange::new(f64::NEG_INFINITY, 0.0).is_err());
        assert!(NumericRange::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_range_deserialize_validates() {
        let ok: NumericRange = toml::from_str("min = -40.0\nmax = 120.0").unwrap();
        assert_eq!(ok.span(), 160.0);

        let bad = toml::from_str::<NumericRange>("min = 5.0\nmax = 1.0");
        assert!(bad.is_err(), "inverted range must not deserialize");
    }

    // -------------------------------------------------------------------------
    // Normalize / Denormalize Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_normalize_clamps_by_default_flag() {
        let r = range(0.0, 200.0);
        assert!((normalize(50.0, &r, true) - 0.25).abs() < EPS);
        assert_eq!(normalize(250.0, &r, true), 1.0, "clamped above max");
        assert_eq!(normalize(-10.0, &r, true), 0.0, "clamped below min");
    }

    #[test]
    fn test_normalize_unclamped_can_leave_unit_interval() {
        let r = range(0.0, 200.0);
        assert!((normalize(250.0, &r, false) - 1.25).abs() < EPS);
        assert!((normalize(-20.0, &r, false) + 0.1).abs() < EPS);
    }

    #[test]
    fn test_denormalize_flag_is_independent() {
        let r = range(-40.0, 60.0);
        assert!((denormalize(0.5, &r, true) - 10.0).abs() < EPS);
        assert_eq!(denormalize(1.5, &r, true), 60.0);
        assert!((denormalize(1.5, &r, false) - 110.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_denormalize_round_trip() {
        let ranges = [range(0.0, 1.0), range(-40.0, 120.0), range(1e-3, 2e-3), range(-1e6, 1e6)];
        for r in &ranges {
            for step in 0..=20 {
                let u = f64::from(step) / 20.0;
                let back = normalize(denormalize(u, r, true), r, true);
                assert!((back - u).abs() < 1e-9, "round trip of {u} over {r:?} gave {back}");
            }
        }
    }

    #[test]
    fn test_map_range_to_pixels() {
        let temp = range(0.0, 100.0);
        let pixels = range(10.0, 210.0);
        assert!((map_range(25.0, &temp, &pixels, true) - 60.0).abs() < EPS);
        assert_eq!(map_range(150.0, &temp, &pixels, true), 210.0);
    }

    // -------------------------------------------------------------------------
    // Angle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_value_to_angle_on_speedometer_arc() {
        let r = range(0.0, 240.0);
        let arc = ArcSpan::from_degrees(135.0, 270.0).unwrap();
        assert!((value_to_angle(0.0, &r, &arc, true) - 135f64.to_radians()).abs() < EPS);
        assert!((value_to_angle(120.0, &r, &arc, true) - 270f64.to_radians()).abs() < EPS);
        assert!((value_to_angle(999.0, &r, &arc, true) - 405f64.to_radians()).abs() < EPS);
    }

    #[test]
    fn test_arc_span_rejects_zero_sweep() {
        assert!(ArcSpan::from_degrees(0.0, 0.0).is_err());
        assert!(ArcSpan::from_degrees(f64::NAN, 90.0).is_err());
        assert!(ArcSpan::from_degrees(90.0, -180.0).is_ok(), "counter-clockwise sweeps are fine");
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert!((angular_distance_deg(359.0, 1.0) - 2.0).abs() < EPS);
        assert!((angular_distance_deg(90.0, 270.0) - 180.0).abs() < EPS);
        assert!((angular_distance_deg(-10.0, 10.0) - 20.0).abs() < EPS);
    }

    // -------------------------------------------------------------------------
    // Polar Conversion Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_polar_to_cartesian_screen_orientation() {
        let c = Point2::new(100.0, 100.0);
        let east = polar_to_cartesian(c, 50.0, 0.0).unwrap();
        assert_eq!(east.to_point(), Point::new(150, 100));

        // Positive angles turn clockwise on screen (downwards first)
        let south = polar_to_cartesian(c, 50.0, 90f64.to_radians()).unwrap();
        assert_eq!(south.to_point(), Point::new(100, 150));
    }

    #[test]
    fn test_polar_to_cartesian_rejects_bad_radius() {
        let c = Point2::new(0.0, 0.0);
        assert!(matches!(
            polar_to_cartesian(c, -1.0, 0.0),
            Err(GaugeError::InvalidNumericInput { name: "radius", .. })
        ));
        assert!(polar_to_cartesian(c, f64::INFINITY, 0.0).is_err());
        assert!(polar_to_cartesian(c, 0.0, 0.0).is_ok(), "zero radius is the center");
    }
}
