//! Segmented horizontal bar (LED bargraph).
//!
//! ```text
//!   +------------------------------+
//!   |            BOOST             |
//!   |  ████████████░░░░░░░░░░░░░░  |
//!   |  |    |    |    |    |    |  |
//!   |  0   0.5   1   1.5   2  2.5  |
//!   |           1.42 bar           |
//!   +------------------------------+
//! ```
//!
//! Unlit segments are part of the cached background; only lit segments are
//! drawn per frame. A value lights `round(fraction * SEGMENTS)` segments.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

use super::{GaugeAdapter, GaugeKind, GaugeScene, draw_readout, draw_title, labels_visible, tick_label};
use crate::error::Result;
use crate::geometry::normalize;
use crate::styles::{BEZEL_STROKE, CENTERED, LABEL_FONT};
use crate::surface::{Canvas, RenderSurface};
use crate::ticks::TickKind;
use crate::widgets::primitives::{
    Axis,
    LinearScale,
    draw_bezel_rect,
    draw_label,
    draw_linear_ticks,
    fill_rect_face,
};

/// Number of bar segments.
pub const SEGMENTS: u32 = 20;

/// Gap between segments.
const SEGMENT_GAP: u32 = 2;

/// Horizontal padding on both sides of the bar.
const SIDE_MARGIN: u32 = 10;

const MAJOR_TICK_LEN: u32 = 6;
const MINOR_TICK_LEN: u32 = 3;

#[derive(Clone, Copy, Debug, Default)]
pub struct BargraphAdapter;

/// Bar geometry derived from the scene size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Bar {
    left: i32,
    top: i32,
    segment_width: u32,
    height: u32,
}

impl Bar {
    fn of(scene: &GaugeScene<'_>) -> Self {
        let Size { width, height } = scene.size;
        let usable = width.saturating_sub(2 * SIDE_MARGIN);
        let segment_width = (usable.saturating_sub(SEGMENT_GAP * (SEGMENTS - 1)) / SEGMENTS).max(1);
        let length = segment_width * SEGMENTS + SEGMENT_GAP * (SEGMENTS - 1);
        Self {
            // Center the bar when the width does not divide evenly
            left: (width.saturating_sub(length) / 2) as i32,
            top: (height * 3 / 10) as i32,
            segment_width,
            height: (height / 5).max(4),
        }
    }

    fn segment(
        &self,
        index: u32,
    ) -> Rectangle {
        let x = self.left + (index * (self.segment_width + SEGMENT_GAP)) as i32;
        Rectangle::new(Point::new(x, self.top), Size::new(self.segment_width, self.height))
    }

    fn bottom(&self) -> i32 { self.top + self.height as i32 }

    /// Scale under the bar, aligned with the outer segment edges.
    fn scale(&self) -> LinearScale {
        LinearScale {
            origin: Point::new(self.left, self.bottom() + 2),
            length: self.segment_width * SEGMENTS + SEGMENT_GAP * (SEGMENTS - 1) - 1,
            axis: Axis::Horizontal,
        }
    }
}

/// Segments lit for `fraction` of the range.
pub fn lit_segments(fraction: f64) -> u32 { (fraction.clamp(0.0, 1.0) * f64::from(SEGMENTS)).round() as u32 }

impl GaugeAdapter for BargraphAdapter {
    fn kind(&self) -> GaugeKind { GaugeKind::Bargraph }

    fn draw_frame<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let bounds = surface.bounds();
        draw_bezel_rect(surface.canvas_mut(), bounds, scene.palette.frame, BEZEL_STROKE);
        Ok(())
    }

    fn draw_background<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let palette = scene.palette;
        let gradients = surface.capabilities().gradients;
        let face = surface.bounds().offset(-(BEZEL_STROKE as i32));
        fill_rect_face(surface.canvas_mut(), face, palette.face_inner, palette.face_outer, gradients);

        let bar = Bar::of(scene);
        let unlit = PrimitiveStyle::with_stroke(palette.frame, 1);
        for index in 0..SEGMENTS {
            bar.segment(index).into_styled(unlit).draw(surface.canvas_mut()).ok();
        }

        let scale = bar.scale();
        draw_linear_ticks(surface.canvas_mut(), &scale, scene.ticks, MAJOR_TICK_LEN, MINOR_TICK_LEN, palette.scale);

        if let Some(threshold) = scene.config.threshold {
            let at = scale.point_at(normalize(threshold, &scene.range, true));
            Line::new(Point::new(at.x, bar.top - 4), Point::new(at.x, bar.top - 1))
                .into_styled(PrimitiveStyle::with_stroke(palette.warning, 2))
                .draw(surface.canvas_mut())
                .ok();
        }

        if labels_visible(scene, surface) {
            let below = Point::new(0, MAJOR_TICK_LEN as i32 + 8);
            for tick in scene.ticks.iter().filter(|t| t.kind == TickKind::Major) {
                let position = scale.point_at(tick.position) + below;
                draw_label(surface.canvas_mut(), &tick_label(tick.value)?, position, LABEL_FONT, palette.text, CENTERED);
            }
        }

        draw_title(scene, surface, Point::new((scene.size.width / 2) as i32, (scene.size.height * 3 / 20) as i32));
        Ok(())
    }

    fn draw_content<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let bar = Bar::of(scene);
        let lit = PrimitiveStyle::with_fill(scene.tone_color());
        for index in 0..lit_segments(normalize(scene.value, &scene.range, true)) {
            bar.segment(index).into_styled(lit).draw(surface.canvas_mut()).ok();
        }
        Ok(())
    }

    fn draw_foreground<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let y = (scene.size.height * 8 / 10) as i32;
        draw_readout(scene, surface, Point::new((scene.size.width / 2) as i32, y))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::Tone;
    use crate::colors::{ACCENT_CYAN, YELLOW};
    use crate::config::GaugeConfig;
    use crate::gauges::test_support::{count, no_text, render_once};

    fn config() -> GaugeConfig { GaugeConfig { width: 200, height: 100, ..GaugeConfig::default() } }

    #[test]
    fn test_lit_segments_rounds_and_clamps() {
        assert_eq!(lit_segments(0.0), 0);
        assert_eq!(lit_segments(0.024), 0);
        assert_eq!(lit_segments(0.025), 1);
        assert_eq!(lit_segments(0.5), 10);
        assert_eq!(lit_segments(1.0), SEGMENTS);
        assert_eq!(lit_segments(1.7), SEGMENTS);
        assert_eq!(lit_segments(-0.3), 0);
    }

    #[test]
    fn test_lit_area_is_proportional() {
        let (half, _) = render_once(BargraphAdapter, config(), 50.0, no_text());
        let (full, _) = render_once(BargraphAdapter, config(), 100.0, no_text());
        assert_eq!(count(&full, ACCENT_CYAN), 2 * count(&half, ACCENT_CYAN));

        let (empty, _) = render_once(BargraphAdapter, config(), 0.0, no_text());
        assert_eq!(count(&empty, ACCENT_CYAN), 0);
    }

    #[test]
    fn test_segments_use_tone_color() {
        let config = GaugeConfig { threshold: Some(60.0), ..config() };
        let (ctx, result) = render_once(BargraphAdapter, config, 75.0, no_text());
        assert_eq!(result.tone, Tone::Warning);
        assert_eq!(count(&ctx, ACCENT_CYAN), 0);
        assert!(count(&ctx, YELLOW) > 0);
    }

    #[test]
    fn test_bar_fits_inside_margins() {
        let config = config();
        let palette = crate::colors::Palette::default();
        let scene = GaugeScene {
            config: &config,
            palette: &palette,
            range: config.range().unwrap(),
            arc: config.arc().unwrap(),
            ticks: &[],
            value: 0.0,
            tone: Tone::Accent,
            active_alerts: &[],
            size: Size::new(200, 100),
        };
        let bar = Bar::of(&scene);
        assert_eq!(bar.segment_width, 7);
        let last = bar.segment(SEGMENTS - 1);
        assert!(bar.left >= SIDE_MARGIN as i32);
        assert!(last.top_left.x + last.size.width as i32 <= 200 - SIDE_MARGIN as i32);
    }
}
