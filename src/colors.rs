//! Color constants, the gauge palette and RGB565 color math.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)
//!
//! # Transparent Key
//!
//! Offscreen layer buffers are cleared to [`TRANSPARENT_KEY`] and blits skip
//! pixels of that color. Palettes must therefore never use pure magenta.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::alerts::Tone;

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

pub const BLACK: Rgb565 = Rgb565::BLACK;

pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red (31, 0, 0). Danger tone.
pub const RED: Rgb565 = Rgb565::RED;

pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Custom Colors
// =============================================================================

/// Orange warning color. RGB565: (31, 32, 0) - slightly darker than yellow.
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

/// Dark gray for bezels and minor ticks. RGB565: (8, 16, 8).
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

/// Light gray for scales on dark faces. RGB565: (24, 48, 24).
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(24, 48, 24);

/// Cyan accent for needles and value bars. RGB565: (0, 48, 28).
pub const ACCENT_CYAN: Rgb565 = Rgb565::new(0, 48, 28);

/// Near-black face center. RGB565: (2, 4, 3).
pub const FACE_DARK: Rgb565 = Rgb565::new(2, 4, 3);

/// Face rim, slightly lifted from the center. RGB565: (6, 12, 8).
pub const FACE_RIM: Rgb565 = Rgb565::new(6, 12, 8);

/// Color offscreen buffers clear to; blits skip it.
pub const TRANSPARENT_KEY: Rgb565 = Rgb565::MAGENTA;

// =============================================================================
// Palette
// =============================================================================

/// Fully resolved paint tokens for one gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Main surface clear color.
    pub background: Rgb565,
    /// Bezel stroke.
    pub frame: Rgb565,
    /// Face color at the center (gradient start).
    pub face_inner: Rgb565,
    /// Face color at the rim (gradient end).
    pub face_outer: Rgb565,
    /// Ticks and scale arc.
    pub scale: Rgb565,
    pub text: Rgb565,
    pub needle: Rgb565,
    pub accent: Rgb565,
    pub warning: Rgb565,
    pub danger: Rgb565,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: BLACK,
            frame: GRAY,
            face_inner: FACE_DARK,
            face_outer: FACE_RIM,
            scale: LIGHT_GRAY,
            text: WHITE,
            needle: ORANGE,
            accent: ACCENT_CYAN,
            warning: YELLOW,
            danger: RED,
        }
    }
}

impl Palette {
    /// Indicator color for a tone.
    pub const fn tone_color(
        &self,
        tone: Tone,
    ) -> Rgb565 {
        match tone {
            Tone::Accent => self.accent,
            Tone::Warning => self.warning,
            Tone::Danger => self.danger,
        }
    }
}

// =============================================================================
// Color Math
// =============================================================================

/// Linear interpolation between two Rgb565 colors (`t` clamped to `[0, 1]`).
///
/// Uses integer math with 8-bit fixed-point on the raw 5/6/5 components.
pub fn lerp_rgb565(
    from: Rgb565,
    to: Rgb565,
    t: f64,
) -> Rgb565 {
    let t_fixed = (t.clamp(0.0, 1.0) * 256.0).round() as i32;
    let mix = |a: u8, b: u8| -> u8 {
        let (a, b) = (i32::from(a), i32::from(b));
        (a + (((b - a) * t_fixed) >> 8)) as u8
    };
    if t_fixed >= 256 {
        return to;
    }
    Rgb565::new(mix(from.r(), to.r()), mix(from.g(), to.g()), mix(from.b(), to.b()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb565(BLACK, WHITE, 0.0), BLACK);
        assert_eq!(lerp_rgb565(BLACK, WHITE, 1.0), WHITE);
        assert_eq!(lerp_rgb565(RED, RED, 0.5), RED, "same color stays put");
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = lerp_rgb565(BLACK, WHITE, 0.5);
        assert_eq!((mid.r(), mid.g(), mid.b()), (15, 31, 15));
    }

    #[test]
    fn test_lerp_clamps_t() {
        assert_eq!(lerp_rgb565(BLACK, WHITE, 2.0), WHITE);
        assert_eq!(lerp_rgb565(BLACK, WHITE, -1.0), BLACK);
    }

    #[test]
    fn test_palette_tone_colors() {
        let palette = Palette::default();
        assert_eq!(palette.tone_color(Tone::Accent), ACCENT_CYAN);
        assert_eq!(palette.tone_color(Tone::Warning), YELLOW);
        assert_eq!(palette.tone_color(Tone::Danger), RED);
    }

    #[test]
    fn test_default_palette_avoids_transparent_key() {
        let p = Palette::default();
        let tokens =
            [p.background, p.frame, p.face_inner, p.face_outer, p.scale, p.text, p.needle, p.accent, p.warning, p.danger];
        assert!(!tokens.contains(&TRANSPARENT_KEY), "palette must not collide with the transparent key");
    }
}
