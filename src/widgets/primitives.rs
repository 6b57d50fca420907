//! Low-level drawing primitives shared by every gauge kind.
//!
//! All functions draw onto any `embedded-graphics` target over `Rgb565` and
//! ignore draw errors (`.ok()`), matching the immediate-mode model: a failed
//! pixel write has no caller-visible recovery. Functions that place shapes by
//! polar coordinates return `Result` because the geometry itself can be
//! invalid (negative radius, non-finite angle).
//!
//! # Arcs
//!
//! Arcs are polylines in the screen angle convention of
//! [`geometry`](crate::geometry) (0 rad at 3 o'clock, clockwise). Segment count
//! scales with arc length so large gauges stay smooth and small ones stay
//! cheap.
//!
//! # Faces
//!
//! Faces use a radial (or vertical) color ramp from `inner` to `outer` when
//! the surface supports gradients, drawn as concentric bands with
//! [`lerp_rgb565`]. Without gradient support the face is filled flat with
//! `inner`.
//!
//! # Blitting
//!
//! [`blit`] copies one canvas onto another pixel by pixel, skipping the
//! transparent key color. Runs of opaque pixels are emitted through a single
//! `draw_iter` call per row.

use core::fmt::Write;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle,
    CornerRadii,
    Line,
    PrimitiveStyle,
    PrimitiveStyleBuilder,
    Rectangle,
    RoundedRectangle,
    Triangle,
};
use embedded_graphics::text::{Text, TextStyle};

use crate::colors::lerp_rgb565;
use crate::error::{GaugeError, Result};
use crate::geometry::{ArcSpan, Point2, polar_to_cartesian};
use crate::styles::CENTERED;
use crate::surface::Canvas;
use crate::ticks::{Tick, TickKind};
use crate::trend::Trend;

/// Number of color bands in a gradient face.
const FACE_BANDS: u32 = 12;

/// Approximate pixel length of one arc segment.
const ARC_SEGMENT_PX: f64 = 4.0;

// =============================================================================
// Arcs & Ticks
// =============================================================================

/// Stroke an arc of `radius` around `center`.
pub fn draw_arc<D>(
    display: &mut D,
    center: Point2,
    radius: f64,
    arc: &ArcSpan,
    color: Rgb565,
    width: u32,
) -> Result<()>
where
    D: DrawTarget<Color = Rgb565>,
{
    let segments = ((arc.sweep.abs() * radius) / ARC_SEGMENT_PX).ceil().clamp(4.0, 360.0) as u32;
    let style = PrimitiveStyle::with_stroke(color, width);
    let mut prev = polar_to_cartesian(center, radius, arc.start)?.to_point();
    for i in 1..=segments {
        let angle = arc.angle_at(f64::from(i) / f64::from(segments));
        let next = polar_to_cartesian(center, radius, angle)?.to_point();
        Line::new(prev, next).into_styled(style).draw(display).ok();
        prev = next;
    }
    Ok(())
}

/// Fill the ring between `inner_radius` and `outer_radius` along `arc`.
pub fn draw_arc_band<D>(
    display: &mut D,
    center: Point2,
    inner_radius: f64,
    outer_radius: f64,
    arc: &ArcSpan,
    color: Rgb565,
) -> Result<()>
where
    D: DrawTarget<Color = Rgb565>,
{
    let width = (outer_radius - inner_radius).abs().max(1.0);
    let mid = (inner_radius + outer_radius) / 2.0;
    draw_arc(display, center, mid, arc, color, width.round() as u32)
}

/// Radial tick marks pointing inwards from `outer_radius`.
///
/// Tick positions map onto `arc` unclamped, like the ticks themselves.
#[allow(clippy::too_many_arguments)]
pub fn draw_radial_ticks<D>(
    display: &mut D,
    center: Point2,
    ticks: &[Tick],
    arc: &ArcSpan,
    outer_radius: f64,
    major_len: f64,
    minor_len: f64,
    color: Rgb565,
) -> Result<()>
where
    D: DrawTarget<Color = Rgb565>,
{
    for tick in ticks {
        let angle = arc.angle_at(tick.position);
        let (len, width) = match tick.kind {
            TickKind::Major => (major_len, crate::styles::MAJOR_TICK_STROKE),
            TickKind::Minor => (minor_len, crate::styles::MINOR_TICK_STROKE),
        };
        let outer = polar_to_cartesian(center, outer_radius, angle)?.to_point();
        let inner = polar_to_cartesian(center, (outer_radius - len).max(0.0), angle)?.to_point();
        Line::new(outer, inner).into_styled(PrimitiveStyle::with_stroke(color, width)).draw(display).ok();
    }
    Ok(())
}

/// Orientation of a straight scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Values grow left to right.
    Horizontal,
    /// Values grow bottom to top.
    Vertical,
}

/// A straight scale: where it starts and how long it is along its axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearScale {
    /// Pixel of fraction 0 (left end or bottom end).
    pub origin: Point,
    pub length: u32,
    pub axis: Axis,
}

impl LinearScale {
    /// Pixel for `fraction` along the scale.
    pub fn point_at(
        &self,
        fraction: f64,
    ) -> Point {
        let offset = (fraction * f64::from(self.length)).round() as i32;
        match self.axis {
            Axis::Horizontal => self.origin + Point::new(offset, 0),
            Axis::Vertical => self.origin - Point::new(0, offset),
        }
    }

    /// Unit vector perpendicular to the scale, pointing to the tick side.
    const fn normal(&self) -> Point {
        match self.axis {
            Axis::Horizontal => Point::new(0, 1),
            Axis::Vertical => Point::new(1, 0),
        }
    }
}

/// Tick marks along a straight scale, drawn on the normal side.
pub fn draw_linear_ticks<D>(
    display: &mut D,
    scale: &LinearScale,
    ticks: &[Tick],
    major_len: u32,
    minor_len: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let normal = scale.normal();
    for tick in ticks {
        let start = scale.point_at(tick.position);
        let len = match tick.kind {
            TickKind::Major => major_len,
            TickKind::Minor => minor_len,
        } as i32;
        Line::new(start, start + normal * len).into_styled(PrimitiveStyle::with_stroke(color, 1)).draw(display).ok();
    }
}

// =============================================================================
// Indicators
// =============================================================================

/// Needle from the center outwards with a hub cap.
pub fn draw_needle<D>(
    display: &mut D,
    center: Point2,
    length: f64,
    angle: f64,
    color: Rgb565,
    width: u32,
) -> Result<()>
where
    D: DrawTarget<Color = Rgb565>,
{
    let tip = polar_to_cartesian(center, length, angle)?.to_point();
    // Short tail behind the hub
    let tail = polar_to_cartesian(center, length * 0.15, angle + core::f64::consts::PI)?.to_point();
    Line::new(tail, tip).into_styled(PrimitiveStyle::with_stroke(color, width)).draw(display).ok();
    Circle::with_center(center.to_point(), width * 3).into_styled(PrimitiveStyle::with_fill(color)).draw(display).ok();
    Ok(())
}

/// Triangular pointer whose tip touches `tip`, pointing against `direction`.
///
/// `direction` is the unit step from the tip towards the pointer's base.
pub fn draw_pointer<D>(
    display: &mut D,
    tip: Point,
    direction: Point,
    size: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let size = size as i32;
    let base = tip + direction * size;
    let half = Point::new(direction.y, direction.x) * (size / 2);
    Triangle::new(tip, base + half, base - half).into_styled(PrimitiveStyle::with_fill(color)).draw(display).ok();
}

/// Draw a trend arrow indicator centered on `(x, y)`.
///
/// Up and down arrows are a vertical shaft with a two-stroke head (8px tall,
/// 6px wide). Steady is a horizontal dash.
pub fn draw_trend_arrow<D>(
    display: &mut D,
    x: i32,
    y: i32,
    trend: Trend,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let arrow_style = PrimitiveStyle::with_stroke(color, 1);
    let segments: &[(Point, Point)] = match trend {
        Trend::Up => &[
            (Point::new(x, y + 4), Point::new(x, y - 4)),
            (Point::new(x - 3, y - 1), Point::new(x, y - 4)),
            (Point::new(x + 3, y - 1), Point::new(x, y - 4)),
        ],
        Trend::Down => &[
            (Point::new(x, y - 4), Point::new(x, y + 4)),
            (Point::new(x - 3, y + 1), Point::new(x, y + 4)),
            (Point::new(x + 3, y + 1), Point::new(x, y + 4)),
        ],
        Trend::Steady => &[(Point::new(x - 4, y), Point::new(x + 4, y))],
    };
    for &(from, to) in segments {
        Line::new(from, to).into_styled(arrow_style).draw(display).ok();
    }
}

// =============================================================================
// Faces & Bezels
// =============================================================================

/// Round face centered on `center`.
pub fn fill_round_face<D>(
    display: &mut D,
    center: Point,
    radius: u32,
    inner: Rgb565,
    outer: Rgb565,
    gradients: bool,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if !gradients {
        Circle::with_center(center, radius * 2).into_styled(PrimitiveStyle::with_fill(inner)).draw(display).ok();
        return;
    }
    // Outermost band first, each smaller disc paints over the previous
    for band in 0..FACE_BANDS {
        let t = 1.0 - f64::from(band) / f64::from(FACE_BANDS);
        let r = radius * (FACE_BANDS - band) / FACE_BANDS;
        let color = lerp_rgb565(inner, outer, t);
        Circle::with_center(center, (r * 2).max(1)).into_styled(PrimitiveStyle::with_fill(color)).draw(display).ok();
    }
}

/// Rectangular face with a top (`outer`) to middle (`inner`) ramp.
pub fn fill_rect_face<D>(
    display: &mut D,
    area: Rectangle,
    inner: Rgb565,
    outer: Rgb565,
    gradients: bool,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if !gradients || area.size.height < FACE_BANDS {
        area.into_styled(PrimitiveStyle::with_fill(inner)).draw(display).ok();
        return;
    }
    let band_height = area.size.height / FACE_BANDS;
    for band in 0..FACE_BANDS {
        // Symmetric ramp: edges use `outer`, the middle band `inner`
        let from_middle = (f64::from(band) + 0.5) / f64::from(FACE_BANDS) - 0.5;
        let color = lerp_rgb565(inner, outer, from_middle.abs() * 2.0);
        let top = area.top_left.y + (band * band_height) as i32;
        let height = if band == FACE_BANDS - 1 { area.size.height - band * band_height } else { band_height };
        Rectangle::new(Point::new(area.top_left.x, top), Size::new(area.size.width, height))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }
}

/// Circular bezel ring.
pub fn draw_bezel_circle<D>(
    display: &mut D,
    center: Point,
    radius: u32,
    color: Rgb565,
    width: u32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyleBuilder::new()
        .stroke_color(color)
        .stroke_width(width)
        .stroke_alignment(embedded_graphics::primitives::StrokeAlignment::Inside)
        .build();
    Circle::with_center(center, radius * 2).into_styled(style).draw(display).ok();
}

/// Rounded rectangular bezel.
pub fn draw_bezel_rect<D>(
    display: &mut D,
    area: Rectangle,
    color: Rgb565,
    width: u32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyleBuilder::new()
        .stroke_color(color)
        .stroke_width(width)
        .stroke_alignment(embedded_graphics::primitives::StrokeAlignment::Inside)
        .build();
    RoundedRectangle::new(area, CornerRadii::new(Size::new(6, 6))).into_styled(style).draw(display).ok();
}

// =============================================================================
// Text
// =============================================================================

/// Byte capacity of a formatted readout: sign, 20 integer digits, the point
/// and [`MAX_DECIMALS`](crate::config::MAX_DECIMALS) fraction digits, plus a
/// space and a [`MAX_UNIT_LEN`](crate::config::MAX_UNIT_LEN) unit.
pub const READOUT_CAPACITY: usize = 48;

/// `value` with `decimals` fraction digits and an optional unit (`"1.42 bar"`).
///
/// Fails with [`GaugeError::TextOverflow`] when the text exceeds
/// [`READOUT_CAPACITY`] (very large magnitudes or long units).
pub fn format_readout(
    value: f64,
    decimals: usize,
    unit: &str,
) -> Result<heapless::String<READOUT_CAPACITY>> {
    let overflow = |_| GaugeError::TextOverflow { capacity: READOUT_CAPACITY };
    let mut s = heapless::String::new();
    write!(s, "{value:.decimals$}").map_err(overflow)?;
    if !unit.is_empty() {
        write!(s, " {unit}").map_err(overflow)?;
    }
    Ok(s)
}

/// Numeric readout with optional unit, centered on `position`.
pub fn draw_value_text<D>(
    display: &mut D,
    position: Point,
    value: f64,
    decimals: usize,
    unit: &str,
    font: &MonoFont<'_>,
    color: Rgb565,
) -> Result<()>
where
    D: DrawTarget<Color = Rgb565>,
{
    let s = format_readout(value, decimals, unit)?;
    Text::with_text_style(&s, position, MonoTextStyle::new(font, color), CENTERED).draw(display).ok();
    Ok(())
}

/// Single line of text.
pub fn draw_label<D>(
    display: &mut D,
    text: &str,
    position: Point,
    font: &MonoFont<'_>,
    color: Rgb565,
    alignment: TextStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_text_style(text, position, MonoTextStyle::new(font, color), alignment).draw(display).ok();
}

// =============================================================================
// Blit
// =============================================================================

/// Copy `src` onto `dst` at `offset`, skipping pixels equal to `key`.
pub fn blit<S, D>(
    src: &S,
    dst: &mut D,
    offset: Point,
    key: Rgb565,
) where
    S: Canvas,
    D: DrawTarget<Color = Rgb565>,
{
    let size = src.size();
    for y in 0..size.height as i32 {
        let row = (0..size.width as i32).filter_map(|x| {
            let p = Point::new(x, y);
            src.pixel(p).filter(|&c| c != key).map(|c| Pixel(p + offset, c))
        });
        dst.draw_iter(row).ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
