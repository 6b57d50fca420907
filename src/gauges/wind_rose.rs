//! Wind rose: 16-point rose showing where the wind comes from.
//!
//! The arrow sits on the rim at the heading and points inwards. The 22.5°
//! sector of the nearest compass point is highlighted in the tone color and
//! the readout names it (`NW 315`).

use core::fmt::Write;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Triangle};

use super::compass::{Rose, draw_heading_label, draw_rose_base, heading_to_angle, heading_window};
use super::{GaugeAdapter, GaugeKind, GaugeScene, draw_title, inset, labels_visible};
use crate::error::{GaugeError, Result};
use crate::geometry::polar_to_cartesian;
use crate::styles::{BEZEL_STROKE, CENTERED, NEEDLE_STROKE, value_font_for_width};
use crate::surface::{Canvas, RenderSurface};
use crate::widgets::primitives::{draw_arc_band, draw_bezel_circle, draw_label};

/// The 16 compass points, clockwise from north.
pub const COMPASS_POINTS: [&str; 16] =
    ["N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW"];

/// Degrees covered by one compass point.
pub const SECTOR_DEG: f64 = 360.0 / 16.0;

/// Arrow head length.
const HEAD_LEN: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct WindRoseAdapter;

/// Index of the compass point nearest to `heading`.
pub fn compass_point_index(heading: f64) -> usize { (heading.rem_euclid(360.0) / SECTOR_DEG).round() as usize % 16 }

/// Name of the compass point nearest to `heading`.
pub fn compass_point(heading: f64) -> &'static str { COMPASS_POINTS[compass_point_index(heading)] }

/// Heading rounded to whole degrees in `0..360`; 359.5 and up reads 0.
pub fn whole_degrees(heading: f64) -> u32 { heading.rem_euclid(360.0).round() as u32 % 360 }

impl GaugeAdapter for WindRoseAdapter {
    fn kind(&self) -> GaugeKind { GaugeKind::WindRose }

    fn draw_frame<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        draw_bezel_circle(surface.canvas_mut(), scene.center(), scene.radius(), scene.palette.frame, BEZEL_STROKE);
        Ok(())
    }

    fn draw_background<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        draw_rose_base(scene, surface)?;
        let rose = Rose::of(scene);
        let center = scene.center2();
        let palette = scene.palette;

        // Spokes for the eight principal points
        let spoke = PrimitiveStyle::with_stroke(palette.frame, 1);
        for index in (0..16).step_by(2) {
            let angle = heading_to_angle(index as f64 * SECTOR_DEG);
            let outer = polar_to_cartesian(center, inset(rose.label_radius(), 8.0), angle)?;
            Line::new(scene.center(), outer.to_point()).into_styled(spoke).draw(surface.canvas_mut()).ok();
        }

        if labels_visible(scene, surface) {
            for index in (0..16).step_by(2) {
                let heading = index as f64 * SECTOR_DEG;
                draw_heading_label(surface, center, rose.label_radius(), heading, COMPASS_POINTS[index], palette.text)?;
            }
        }

        draw_title(scene, surface, scene.center() - Point::new(0, (rose.scale / 3.0) as i32));
        Ok(())
    }

    fn draw_content<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let rose = Rose::of(scene);
        let sector_center = compass_point_index(scene.value) as f64 * SECTOR_DEG;
        let sector = heading_window(sector_center, SECTOR_DEG / 2.0);
        draw_arc_band(
            surface.canvas_mut(),
            scene.center2(),
            rose.scale * 0.35,
            inset(rose.label_radius(), 8.0),
            &sector,
            scene.tone_color(),
        )
    }

    fn draw_foreground<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let rose = Rose::of(scene);
        let center = scene.center2();
        let angle = heading_to_angle(scene.value);
        let color = scene.palette.needle;

        // Shaft from the rim inwards, head at the inner end
        let tail = polar_to_cartesian(center, inset(rose.scale, rose.major_len), angle)?;
        let tip_radius = rose.scale * 0.3;
        let tip = polar_to_cartesian(center, tip_radius, angle)?;
        Line::new(tail.to_point(), tip.to_point())
            .into_styled(PrimitiveStyle::with_stroke(color, NEEDLE_STROKE))
            .draw(surface.canvas_mut())
            .ok();
        let spread = HEAD_LEN / (tip_radius + HEAD_LEN);
        let left = polar_to_cartesian(center, tip_radius + HEAD_LEN, angle - spread)?;
        let right = polar_to_cartesian(center, tip_radius + HEAD_LEN, angle + spread)?;
        Triangle::new(tip.to_point(), left.to_point(), right.to_point())
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(surface.canvas_mut())
            .ok();

        if scene.config.visibility.value && surface.capabilities().text {
            let mut s: heapless::String<24> = heapless::String::new();
            write!(s, "{} {}", compass_point(scene.value), whole_degrees(scene.value))
                .map_err(|_| GaugeError::TextOverflow { capacity: 24 })?;
            let position = scene.center() + Point::new(0, (rose.scale / 2.0) as i32);
            let font = value_font_for_width(scene.size.width);
            draw_label(surface.canvas_mut(), &s, position, font, scene.palette.text, CENTERED);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertSeverity, HeadingAlert, Tone};
    use crate::colors::{ACCENT_CYAN, ORANGE, YELLOW};
    use crate::config::GaugeConfig;
    use crate::gauges::Reading;
    use crate::gauges::test_support::{count, no_text, render_once};
    use crate::surface::Capabilities;

    fn config() -> GaugeConfig { GaugeConfig { width: 120, height: 120, ..GaugeConfig::default() } }

    #[test]
    fn test_compass_point_names() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(11.0), "N");
        assert_eq!(compass_point(12.0), "NNE");
        assert_eq!(compass_point(45.0), "NE");
        assert_eq!(compass_point(315.0), "NW");
        assert_eq!(compass_point(350.0), "N", "wraps back to north");
        assert_eq!(compass_point(-90.0), "W");
        assert_eq!(compass_point(720.0 + 180.0), "S");
    }

    #[test]
    fn test_whole_degrees_folds_to_zero() {
        assert_eq!(whole_degrees(315.0), 315);
        assert_eq!(whole_degrees(359.4), 359);
        assert_eq!(whole_degrees(359.5), 0);
        assert_eq!(whole_degrees(359.99), 0);
        assert_eq!(whole_degrees(-0.2), 0);
        assert_eq!(compass_point(359.7), "N", "name and number agree");
    }

    #[test]
    fn test_arrow_sits_on_the_heading_side() {
        // From the west: shaft between the rim and the center on the left
        let (ctx, result) = render_once(WindRoseAdapter, config(), 270.0, no_text());
        assert_eq!(result.reading, Reading::Heading(270.0));
        assert_eq!(ctx.main().canvas().pixel(Point::new(25, 60)), Some(ORANGE));
        assert_ne!(ctx.main().canvas().pixel(Point::new(95, 60)), Some(ORANGE));
    }

    #[test]
    fn test_sector_highlight_follows_tone() {
        let (calm, _) = render_once(WindRoseAdapter, config(), 10.0, no_text());
        assert!(count(&calm, ACCENT_CYAN) > 0);

        let config = GaugeConfig {
            heading_alerts: vec![HeadingAlert {
                id: "onshore".into(),
                heading: 270.0,
                message: "Onshore wind".into(),
                severity: AlertSeverity::Warning,
            }],
            ..config()
        };
        let (gusty, result) = render_once(WindRoseAdapter, config, 265.0, no_text());
        assert_eq!(result.tone, Tone::Warning);
        assert_eq!(count(&gusty, ACCENT_CYAN), 0);
        assert!(count(&gusty, YELLOW) > 0);
    }

    #[test]
    fn test_readout_needs_text_capability() {
        let (with_text, _) = render_once(WindRoseAdapter, config(), 315.0, Capabilities::default());
        let (without, _) = render_once(WindRoseAdapter, config(), 315.0, no_text());
        let white = crate::colors::WHITE;
        assert!(count(&with_text, white) > 0);
        assert_eq!(count(&without, white), 0);
    }
}
