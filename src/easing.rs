//! Easing curves mapping linear progress to eased progress.
//!
//! All built-in curves satisfy `f(0) = 0` and `f(1) = 1`. Only
//! [`Easing::EaseOutBack`] leaves `[0, 1]` in between (it overshoots); the
//! timeline clamps eased progress afterwards.
//!
//! Names follow the common CSS/JS vocabulary (`easeInOutCubic`) and are also
//! accepted in snake case (`ease_in_out_cubic`) so TOML configs read naturally.

use core::fmt;
use core::str::FromStr;
use std::rc::Rc;

use crate::error::GaugeError;

/// Easing curve.
#[derive(Clone, Default)]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
    /// Overshoots past 1 before settling.
    EaseOutBack,
    /// Caller-supplied curve.
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    /// Wrap an arbitrary curve.
    pub fn custom(curve: impl Fn(f64) -> f64 + 'static) -> Self { Self::Custom(Rc::new(curve)) }

    /// Evaluate the curve at `t` (expected in `[0, 1]`).
    pub fn apply(
        &self,
        t: f64,
    ) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseOutBack => {
                const C1: f64 = 1.701_58;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Self::Custom(curve) => curve(t),
        }
    }

    /// Canonical (camelCase) name, `"custom"` for injected curves.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInQuad => "easeInQuad",
            Self::EaseOutQuad => "easeOutQuad",
            Self::EaseInOutQuad => "easeInOutQuad",
            Self::EaseInCubic => "easeInCubic",
            Self::EaseOutCubic => "easeOutCubic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseOutBack => "easeOutBack",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = GaugeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "linear" => Self::Linear,
            "easeInQuad" | "ease_in_quad" => Self::EaseInQuad,
            "easeOutQuad" | "ease_out_quad" => Self::EaseOutQuad,
            "easeInOutQuad" | "ease_in_out_quad" => Self::EaseInOutQuad,
            "easeInCubic" | "ease_in_cubic" => Self::EaseInCubic,
            "easeOutCubic" | "ease_out_cubic" => Self::EaseOutCubic,
            "easeInOutCubic" | "ease_in_out_cubic" => Self::EaseInOutCubic,
            "easeOutBack" | "ease_out_back" => Self::EaseOutBack,
            _ => return Err(GaugeError::UnknownEasing { name: s.to_owned() }),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BUILT_IN: [Easing; 8] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseOutBack,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in &BUILT_IN {
            assert!(easing.apply(0.0).abs() < 1e-12, "{easing:?}(0) must be 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{easing:?}(1) must be 1");
        }
    }

    #[test]
    fn test_in_out_cubic_is_symmetric() {
        let e = Easing::EaseInOutCubic;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-12);
        assert!((e.apply(0.25) - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_ease_out_back_overshoots() {
        let peak = (1..100).map(|i| Easing::EaseOutBack.apply(f64::from(i) / 100.0)).fold(0.0, f64::max);
        assert!(peak > 1.0, "easeOutBack should overshoot, peaked at {peak}");
    }

    #[test]
    fn test_parse_names() {
        for easing in &BUILT_IN {
            let parsed: Easing = easing.name().parse().unwrap();
            assert_eq!(parsed.name(), easing.name());
        }
        assert_eq!("ease_out_back".parse::<Easing>().unwrap().name(), "easeOutBack");
        assert!(matches!("bounce".parse::<Easing>(), Err(GaugeError::UnknownEasing { .. })));
    }

    #[test]
    fn test_custom_curve() {
        let step = Easing::custom(|t| if t < 1.0 { 0.0 } else { 1.0 });
        assert_eq!(step.apply(0.9), 0.0);
        assert_eq!(step.apply(1.0), 1.0);
        assert_eq!(format!("{step:?}"), "custom");
    }

    #[test]
    fn test_default_is_in_out_cubic() {
        assert_eq!(Easing::default().name(), "easeInOutCubic");
    }
}
