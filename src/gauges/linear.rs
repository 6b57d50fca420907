//! Vertical scale with a filled track and a side pointer (thermometer style).
//!
//! ```text
//!   +---------+
//!   |  OIL T  |
//!   |   | 150 |
//!   |   |-    |
//!   |  >█ 100 |
//!   |   █-    |
//!   |   █ 50  |
//!   |  96 C   |
//!   +---------+
//! ```

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

use super::{GaugeAdapter, GaugeKind, GaugeScene, draw_readout, draw_title, labels_visible, tick_label};
use crate::error::Result;
use crate::geometry::normalize;
use crate::styles::{BEZEL_STROKE, LABEL_FONT, LEFT_ALIGNED, SCALE_ARC_STROKE};
use crate::surface::{Canvas, RenderSurface};
use crate::ticks::TickKind;
use crate::widgets::primitives::{
    Axis,
    LinearScale,
    draw_bezel_rect,
    draw_label,
    draw_linear_ticks,
    draw_pointer,
    fill_rect_face,
};

/// Space above the scale for the title.
const TOP_MARGIN: u32 = 24;

/// Space below the scale for the readout.
const BOTTOM_MARGIN: u32 = 28;

/// Track width, drawn left of the axis.
const TRACK_WIDTH: i32 = 6;

const MAJOR_TICK_LEN: u32 = 8;
const MINOR_TICK_LEN: u32 = 4;
const POINTER_SIZE: u32 = 8;

#[derive(Clone, Copy, Debug, Default)]
pub struct LinearAdapter;

/// Vertical scale for the scene, bottom = minimum.
fn scale_of(scene: &GaugeScene<'_>) -> LinearScale {
    let Size { width, height } = scene.size;
    let length = height.saturating_sub(TOP_MARGIN + BOTTOM_MARGIN).max(1);
    LinearScale {
        origin: Point::new((width * 2 / 5) as i32, (TOP_MARGIN + length) as i32),
        length,
        axis: Axis::Vertical,
    }
}

impl GaugeAdapter for LinearAdapter {
    fn kind(&self) -> GaugeKind { GaugeKind::Linear }

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

        let scale = scale_of(scene);
        Line::new(scale.point_at(0.0), scale.point_at(1.0))
            .into_styled(PrimitiveStyle::with_stroke(palette.scale, SCALE_ARC_STROKE))
            .draw(surface.canvas_mut())
            .ok();
        draw_linear_ticks(surface.canvas_mut(), &scale, scene.ticks, MAJOR_TICK_LEN, MINOR_TICK_LEN, palette.scale);

        if let Some(threshold) = scene.config.threshold {
            let at = scale.point_at(normalize(threshold, &scene.range, true));
            Line::new(at - Point::new(TRACK_WIDTH + 4, 0), at + Point::new(MAJOR_TICK_LEN as i32, 0))
                .into_styled(PrimitiveStyle::with_stroke(palette.warning, 1))
                .draw(surface.canvas_mut())
                .ok();
        }

        if labels_visible(scene, surface) {
            let offset = Point::new(MAJOR_TICK_LEN as i32 + 4, 0);
            for tick in scene.ticks.iter().filter(|t| t.kind == TickKind::Major) {
                let position = scale.point_at(tick.position) + offset;
                draw_label(surface.canvas_mut(), &tick_label(tick.value)?, position, LABEL_FONT, palette.text, LEFT_ALIGNED);
            }
        }

        draw_title(scene, surface, Point::new((scene.size.width / 2) as i32, (TOP_MARGIN / 2) as i32));
        Ok(())
    }

    fn draw_content<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let fraction = normalize(scene.value, &scene.range, true);
        if fraction <= 0.0 {
            return Ok(());
        }
        let scale = scale_of(scene);
        let top = scale.point_at(fraction);
        Rectangle::with_corners(
            Point::new(scale.origin.x - TRACK_WIDTH - 1, top.y),
            Point::new(scale.origin.x - 2, scale.origin.y),
        )
        .into_styled(PrimitiveStyle::with_fill(scene.tone_color()))
        .draw(surface.canvas_mut())
        .ok();
        Ok(())
    }

    fn draw_foreground<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let scale = scale_of(scene);
        let at = scale.point_at(normalize(scene.value, &scene.range, true));
        let tip = at - Point::new(TRACK_WIDTH + 3, 0);
        draw_pointer(surface.canvas_mut(), tip, Point::new(-1, 0), POINTER_SIZE, scene.palette.needle);

        let readout_y = scene.size.height.saturating_sub(BOTTOM_MARGIN / 2) as i32;
        draw_readout(scene, surface, Point::new((scene.size.width / 2) as i32, readout_y))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
