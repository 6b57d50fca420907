//! Compass: needle pointing at the heading on a fixed 360° rose.
//!
//! North is at 12 o'clock and headings grow clockwise. Heading alerts are
//! drawn as static windows (`heading ± tolerance`) on the rim, colored by
//! severity; a tone-colored bug marks the current heading.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::{GaugeAdapter, GaugeKind, GaugeScene, draw_readout, draw_title, inset, labels_visible};
use crate::alerts::{AlertSeverity, Tone};
use crate::error::Result;
use crate::geometry::{ArcSpan, Point2, polar_to_cartesian};
use crate::styles::{BEZEL_STROKE, CENTERED, LABEL_FONT, NEEDLE_STROKE};
use crate::surface::{Canvas, RenderSurface};
use crate::widgets::primitives::{
    draw_arc_band,
    draw_bezel_circle,
    draw_label,
    draw_needle,
    draw_radial_ticks,
    fill_round_face,
};

/// Cardinal letters and their headings.
const CARDINALS: [(&str, f64); 4] = [("N", 0.0), ("E", 90.0), ("S", 180.0), ("W", 270.0)];

/// Half-width of the heading bug, degrees.
const BUG_HALF_WIDTH: f64 = 5.0;

const RIM_BAND: f64 = 4.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct CompassAdapter;

/// Screen angle (radians) of a compass heading.
pub fn heading_to_angle(heading: f64) -> f64 { (heading - 90.0).to_radians() }

/// Rim arc of `half_width` degrees either side of `heading`.
pub(crate) fn heading_window(
    heading: f64,
    half_width: f64,
) -> ArcSpan {
    ArcSpan { start: heading_to_angle(heading - half_width), sweep: (2.0 * half_width).to_radians() }
}

/// Severity color of an alert window.
pub(crate) const fn severity_tone(severity: AlertSeverity) -> Tone {
    match severity {
        AlertSeverity::Info => Tone::Accent,
        AlertSeverity::Warning => Tone::Warning,
        AlertSeverity::Critical => Tone::Danger,
    }
}

/// Radii shared by the compass and the wind rose, all clamped at the center.
pub(crate) struct Rose {
    pub face: u32,
    pub scale: f64,
    pub major_len: f64,
    pub minor_len: f64,
}

impl Rose {
    pub fn of(scene: &GaugeScene<'_>) -> Self {
        let face = scene.radius().saturating_sub(BEZEL_STROKE + 1).max(1);
        let scale = inset(f64::from(face), 2.0);
        Self { face, scale, major_len: (scale * 0.12).max(3.0), minor_len: (scale * 0.06).max(2.0) }
    }

    /// Radius of the letters inside the tick ring.
    pub fn label_radius(&self) -> f64 { inset(self.scale, self.major_len + 8.0) }
}

/// Bezel, face and tick ring shared by both heading gauges.
pub(crate) fn draw_rose_base<C: Canvas>(
    scene: &GaugeScene<'_>,
    surface: &mut RenderSurface<C>,
) -> Result<()> {
    let rose = Rose::of(scene);
    let palette = scene.palette;
    let gradients = surface.capabilities().gradients;
    fill_round_face(surface.canvas_mut(), scene.center(), rose.face, palette.face_inner, palette.face_outer, gradients);
    draw_radial_ticks(
        surface.canvas_mut(),
        scene.center2(),
        scene.ticks,
        &scene.arc,
        rose.scale,
        rose.major_len,
        rose.minor_len,
        palette.scale,
    )
}

/// Letter centered on `heading` at `radius`.
pub(crate) fn draw_heading_label<C: Canvas>(
    surface: &mut RenderSurface<C>,
    center: Point2,
    radius: f64,
    heading: f64,
    text: &str,
    color: Rgb565,
) -> Result<()> {
    let position = polar_to_cartesian(center, radius, heading_to_angle(heading))?;
    draw_label(surface.canvas_mut(), text, position.to_point(), LABEL_FONT, color, CENTERED);
    Ok(())
}

impl GaugeAdapter for CompassAdapter {
    fn kind(&self) -> GaugeKind { GaugeKind::Compass }

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
        let palette = scene.palette;

        for alert in &scene.config.heading_alerts {
            let window = heading_window(alert.heading, scene.config.heading_tolerance.max(1.0));
            let color = palette.tone_color(severity_tone(alert.severity));
            draw_arc_band(surface.canvas_mut(), scene.center2(), inset(rose.scale, RIM_BAND), rose.scale, &window, color)?;
        }

        if labels_visible(scene, surface) {
            for (letter, heading) in CARDINALS {
                // North stands out
                let color = if heading == 0.0 { palette.danger } else { palette.text };
                draw_heading_label(surface, scene.center2(), rose.label_radius(), heading, letter, color)?;
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
        let bug = heading_window(scene.value, BUG_HALF_WIDTH);
        draw_arc_band(
            surface.canvas_mut(),
            scene.center2(),
            inset(rose.scale, 2.0 * RIM_BAND),
            inset(rose.scale, RIM_BAND),
            &bug,
            scene.tone_color(),
        )
    }

    fn draw_foreground<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let rose = Rose::of(scene);
        let length = inset(rose.label_radius(), 8.0);
        draw_needle(
            surface.canvas_mut(),
            scene.center2(),
            length,
            heading_to_angle(scene.value),
            scene.palette.needle,
            NEEDLE_STROKE,
        )?;
        draw_readout(scene, surface, scene.center() + Point::new(0, (rose.scale / 2.0) as i32))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
