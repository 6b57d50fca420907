//! Pre-computed static text and stroke styles.
//!
//! Styles are `const` so they live in read-only data and are never rebuilt per
//! frame. Colors that depend on the palette or the current tone are applied at
//! draw time through the exposed font references:
//! `MonoTextStyle::new(LABEL_FONT, palette.text)`.

use embedded_graphics::{
    mono_font::{MonoFont, ascii::FONT_6X10},
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_12_POINT, PROFONT_18_POINT};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered on the anchor point, middle baseline. Readouts and compass letters.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).baseline(Baseline::Middle).build();

/// Left aligned, middle baseline. Linear and bargraph scale labels.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).baseline(Baseline::Middle).build();

// =============================================================================
// Font References
// =============================================================================

/// Small font (6x10) for titles, units and scale numbers.
pub const LABEL_FONT: &MonoFont = &FONT_6X10;

/// Value readout font for gauges at least 160px wide.
pub const VALUE_FONT_LARGE: &MonoFont = &PROFONT_18_POINT;

/// Value readout font for small gauges.
pub const VALUE_FONT_SMALL: &MonoFont = &PROFONT_12_POINT;

/// Width below which readouts switch to [`VALUE_FONT_SMALL`].
pub const SMALL_GAUGE_WIDTH: u32 = 160;

/// Readout font for a gauge of the given width.
#[inline]
pub const fn value_font_for_width(width: u32) -> &'static MonoFont<'static> {
    if width < SMALL_GAUGE_WIDTH { VALUE_FONT_SMALL } else { VALUE_FONT_LARGE }
}

// =============================================================================
// Stroke Widths
// =============================================================================

pub const BEZEL_STROKE: u32 = 3;
pub const MAJOR_TICK_STROKE: u32 = 2;
pub const MINOR_TICK_STROKE: u32 = 1;
pub const NEEDLE_STROKE: u32 = 3;
pub const SCALE_ARC_STROKE: u32 = 2;
