//! Engine constants and per-gauge configuration.
//!
//! # Constants
//!
//! Defaults used when a configuration leaves a field out. They are `const` so
//! call sites share one source of truth.
//!
//! # Gauge Configuration
//!
//! [`GaugeConfig`] is plain serde data. Every field has a default, so a TOML
//! file only needs what differs:
//!
//! ```toml
//! title = "COOLANT"
//! unit = "C"
//! min = 40
//! max = 130
//! threshold = 105
//!
//! [animation]
//! duration_ms = 400
//! easing = "ease_out_cubic"
//!
//! [[alerts]]
//! id = "boil"
//! value = 115
//! message = "Coolant boiling"
//! severity = "critical"
//! ```
//!
//! Only primitive invariants are checked ([`GaugeConfig::validate`]): finite
//! numbers, ordered range, positive sizes and intervals, readout precision,
//! tick counts, easing name. Anything richer belongs to the caller.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alerts::{HeadingAlert, ValueAlert};
use crate::easing::Easing;
use crate::error::{GaugeError, Result, ensure_finite};
use crate::geometry::{ArcSpan, NumericRange};
use crate::ticks::TickOptions;
use crate::trend::TrendOptions;

// =============================================================================
// Animation Defaults
// =============================================================================

/// Frame interval of animation runs (~60 FPS).
pub const DEFAULT_FRAME_MS: f64 = 16.0;

/// Duration of a value change animation.
pub const DEFAULT_DURATION_MS: f64 = 500.0;

// =============================================================================
// Alert & Trend Defaults
// =============================================================================

pub use crate::alerts::DEFAULT_HEADING_TOLERANCE;

/// Minimum change between first and last sample that counts as a trend.
pub const DEFAULT_TREND_THRESHOLD: f64 = 0.5;

/// Trailing trend window (10 minutes).
pub const DEFAULT_TREND_WINDOW_MS: f64 = 600_000.0;

/// Number of samples kept per gauge for trend detection.
pub const HISTORY_SIZE: usize = 50;

// =============================================================================
// Layout Defaults
// =============================================================================

pub const DEFAULT_WIDTH: u32 = 200;

pub const DEFAULT_HEIGHT: u32 = 200;

// =============================================================================
// Readout Limits
// =============================================================================

/// Most digits after the decimal point a readout may show.
pub const MAX_DECIMALS: usize = 10;

/// Longest unit suffix, in bytes.
pub const MAX_UNIT_LEN: usize = 15;

// =============================================================================
// Configuration Structs
// =============================================================================

/// Value animation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// When false, `set_value` renders the target immediately.
    pub enabled: bool,
    pub duration_ms: f64,
    /// Easing name, camelCase or snake_case.
    pub easing: String,
    pub frame_ms: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::default().name().to_owned(),
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

/// Which parts of the gauge are drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Visibility {
    pub frame: bool,
    pub background: bool,
    pub ticks: bool,
    pub labels: bool,
    pub title: bool,
    pub value: bool,
    pub trend: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self { frame: true, background: true, ticks: true, labels: true, title: true, value: true, trend: true }
    }
}

/// Scale layout.
///
/// Tick counts are numbers rather than integers so loosely typed sources
/// (JSON, hand-edited TOML) are validated instead of silently truncated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    pub major_ticks: f64,
    pub minor_ticks: f64,
    /// Radial gauges: angle of the minimum value, degrees clockwise from 3 o'clock.
    pub start_angle: f64,
    /// Radial gauges: degrees covered by the scale.
    pub sweep: f64,
}

impl Default for ScaleSettings {
    fn default() -> Self { Self { major_ticks: 5.0, minor_ticks: 4.0, start_angle: 135.0, sweep: 270.0 } }
}

/// Complete configuration of one gauge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    pub title: String,
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub width: u32,
    pub height: u32,
    /// Digits after the decimal point in the readout, at most [`MAX_DECIMALS`].
    pub decimals: usize,
    pub animation: AnimationSettings,
    pub visibility: Visibility,
    pub scale: ScaleSettings,
    /// Readings at or above this value tint the gauge with the warning tone.
    pub threshold: Option<f64>,
    pub alerts: Vec<ValueAlert>,
    pub heading_alerts: Vec<HeadingAlert>,
    pub heading_tolerance: f64,
    pub trend: TrendOptions,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            unit: String::new(),
            min: 0.0,
            max: 100.0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            decimals: 0,
            animation: AnimationSettings::default(),
            visibility: Visibility::default(),
            scale: ScaleSettings::default(),
            threshold: None,
            alerts: Vec::new(),
            heading_alerts: Vec::new(),
            heading_tolerance: DEFAULT_HEADING_TOLERANCE,
            trend: TrendOptions::default(),
        }
    }
}

impl GaugeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| GaugeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| GaugeError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("loaded gauge config `{}` from {}", config.title, path.display());
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GaugeError::Config(e.to_string()))
    }

    /// Check the primitive invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        self.range()?;
        if self.width == 0 || self.height == 0 {
            return Err(GaugeError::DimensionInvalid { width: self.width, height: self.height });
        }
        if self.decimals > MAX_DECIMALS {
            return Err(GaugeError::InvalidDecimals { decimals: self.decimals, max: MAX_DECIMALS });
        }
        if self.unit.len() > MAX_UNIT_LEN {
            return Err(GaugeError::Config(format!("unit `{}` is longer than {MAX_UNIT_LEN} bytes", self.unit)));
        }
        ensure_finite("duration_ms", self.animation.duration_ms)?;
        if self.animation.duration_ms < 0.0 {
            return Err(GaugeError::InvalidNumericInput { name: "duration_ms", value: self.animation.duration_ms });
        }
        if !self.animation.frame_ms.is_finite() || self.animation.frame_ms <= 0.0 {
            return Err(GaugeError::InvalidNumericInput { name: "frame_ms", value: self.animation.frame_ms });
        }
        if !self.heading_tolerance.is_finite() || self.heading_tolerance < 0.0 {
            return Err(GaugeError::InvalidNumericInput { name: "heading_tolerance", value: self.heading_tolerance });
        }
        if let Some(threshold) = self.threshold {
            ensure_finite("threshold", threshold)?;
        }
        self.arc()?;
        self.tick_options()?;
        self.easing()?;
        self.trend.validate()
    }

    pub fn range(&self) -> Result<NumericRange> { NumericRange::new(self.min, self.max) }

    pub fn easing(&self) -> Result<Easing> { self.animation.easing.parse() }

    pub fn tick_options(&self) -> Result<TickOptions> {
        let options = TickOptions::from_counts(self.scale.major_ticks, self.scale.minor_ticks, true)?;
        if options.major_tick_count < 2 {
            return Err(GaugeError::InvalidTickOptions {
                reason: format!("major_ticks must be at least 2, got {}", options.major_tick_count),
            });
        }
        Ok(options)
    }

    /// Radial arc from `scale.start_angle` / `scale.sweep`.
    pub fn arc(&self) -> Result<ArcSpan> { ArcSpan::from_degrees(self.scale.start_angle, self.scale.sweep) }

    /// Whether `value` is at or above the configured threshold.
    pub fn threshold_breached(
        &self,
        value: f64,
    ) -> bool {
        self.threshold.is_some_and(|t| value >= t)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
