//! Classic dial: needle sweeping a circular arc scale.
//!
//! ```text
//!        .-'''''-.
//!      /  40  60  \
//!     | 20      80 |
//!     |    \       |
//!     | 0   o  100 |
//!      \  72 km/h /
//!        '-.....-'
//! ```
//!
//! The scale follows `scale.start_angle` / `scale.sweep`. A tone-colored band
//! inside the scale arc fills up to the current value; a warning-colored band
//! marks the threshold zone when one is configured.

use embedded_graphics::prelude::*;

use super::{GaugeAdapter, GaugeKind, GaugeScene, draw_readout, draw_title, inset, labels_visible, tick_label};
use crate::error::Result;
use crate::geometry::{ArcSpan, normalize, polar_to_cartesian, value_to_angle};
use crate::styles::{BEZEL_STROKE, CENTERED, LABEL_FONT, NEEDLE_STROKE, SCALE_ARC_STROKE};
use crate::surface::{Canvas, RenderSurface};
use crate::ticks::TickKind;
use crate::widgets::primitives::{
    draw_arc,
    draw_arc_band,
    draw_bezel_circle,
    draw_label,
    draw_needle,
    draw_radial_ticks,
    fill_round_face,
};

/// Width of the value and threshold bands.
const BAND_WIDTH: f64 = 4.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct RadialAdapter;

/// Radii derived from the scene size, all clamped at the center.
struct Dial {
    face: u32,
    scale: f64,
    major_len: f64,
    minor_len: f64,
}

impl Dial {
    fn of(scene: &GaugeScene<'_>) -> Self {
        let face = scene.radius().saturating_sub(BEZEL_STROKE + 1).max(1);
        let scale = inset(f64::from(face), 4.0);
        Self { face, scale, major_len: (scale * 0.12).max(3.0), minor_len: (scale * 0.06).max(2.0) }
    }
}

impl GaugeAdapter for RadialAdapter {
    fn kind(&self) -> GaugeKind { GaugeKind::Radial }

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
        let dial = Dial::of(scene);
        let center = scene.center2();
        let palette = scene.palette;
        let gradients = surface.capabilities().gradients;
        fill_round_face(surface.canvas_mut(), scene.center(), dial.face, palette.face_inner, palette.face_outer, gradients);

        if let Some(threshold) = scene.config.threshold
            && threshold < scene.range.max()
        {
            let from = normalize(threshold, &scene.range, true);
            let zone = ArcSpan { start: scene.arc.angle_at(from), sweep: scene.arc.sweep * (1.0 - from) };
            draw_arc_band(surface.canvas_mut(), center, inset(dial.scale, BAND_WIDTH), dial.scale, &zone, palette.warning)?;
        }

        draw_arc(surface.canvas_mut(), center, dial.scale, &scene.arc, palette.scale, SCALE_ARC_STROKE)?;
        draw_radial_ticks(
            surface.canvas_mut(),
            center,
            scene.ticks,
            &scene.arc,
            dial.scale,
            dial.major_len,
            dial.minor_len,
            palette.scale,
        )?;

        if labels_visible(scene, surface) {
            let label_radius = inset(dial.scale, dial.major_len + 9.0);
            for tick in scene.ticks.iter().filter(|t| t.kind == TickKind::Major) {
                let position = polar_to_cartesian(center, label_radius, scene.arc.angle_at(tick.position))?;
                draw_label(
                    surface.canvas_mut(),
                    &tick_label(tick.value)?,
                    position.to_point(),
                    LABEL_FONT,
                    palette.text,
                    CENTERED,
                );
            }
        }

        let title_offset = (dial.scale / 3.0) as i32;
        draw_title(scene, surface, scene.center() - Point::new(0, title_offset));
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
        let dial = Dial::of(scene);
        let filled = ArcSpan { start: scene.arc.start, sweep: scene.arc.sweep * fraction };
        draw_arc_band(
            surface.canvas_mut(),
            scene.center2(),
            inset(dial.scale, 2.0 * BAND_WIDTH),
            inset(dial.scale, BAND_WIDTH),
            &filled,
            scene.tone_color(),
        )
    }

    fn draw_foreground<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let dial = Dial::of(scene);
        let angle = value_to_angle(scene.value, &scene.range, &scene.arc, true);
        draw_needle(
            surface.canvas_mut(),
            scene.center2(),
            inset(dial.scale, dial.major_len + 2.0),
            angle,
            scene.palette.needle,
            NEEDLE_STROKE,
        )?;
        draw_readout(scene, surface, scene.center() + Point::new(0, (dial.scale / 2.0) as i32))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
