//! Gauge renderers: one generic pipeline, five per-kind adapters.
//!
//! - [`radial`]: needle on a circular arc scale
//! - [`linear`]: pointer on a vertical scale with a filled track
//! - [`bargraph`]: segmented horizontal bar
//! - [`compass`]: heading needle on a 360° rose
//! - [`wind_rose`]: inward arrow and highlighted sector on a 16-point rose
//! - [`animated`]: binds a gauge to a render context and the scheduler
//!
//! # Architecture
//!
//! [`Gauge`] owns everything that is the same for every kind: validation,
//! alert/tone/trend resolution, tick generation, layer caching and extension
//! dispatch. A [`GaugeAdapter`] only knows how to draw its kind, one pipeline
//! stage at a time:
//!
//! | Stage      | Target          | Adapter draws                   | Then                     |
//! |------------|-----------------|---------------------------------|--------------------------|
//! | frame      | cached buffer   | bezel                           | blit                     |
//! | background | cached buffer   | face, scale, labels, title      | blit                     |
//! | content    | main surface    | value indicator                 | overlay, marker exts     |
//! | foreground | main surface    | needle / pointer, readout       | trend arrow, needle exts |
//!
//! Frame and background only depend on configuration, so they are drawn once
//! into offscreen buffers and blitted on every later frame until the render
//! context invalidates them (resize, clear) or the configuration changes.
//!
//! # Heading Gauges
//!
//! Compass and wind-rose gauges ignore `min`/`max` and the radial angles: they
//! always use a `0..360` scale with north at 12 o'clock, wrap readings into
//! `[0, 360)`, match heading alerts and report [`Reading::Heading`]. Their trend
//! history is unwrapped ([`Gauge::record`]) so turning through north reads as
//! a small rotation.

pub mod animated;
pub mod bargraph;
pub mod compass;
pub mod linear;
pub mod radial;
pub mod wind_rose;

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::alerts::{
    ActiveAlert,
    Tone,
    resolve_gauge_heading_alerts,
    resolve_gauge_tone_from_alerts,
    resolve_gauge_value_alerts,
};
use crate::colors::Palette;
use crate::config::GaugeConfig;
use crate::error::{GaugeError, Result, ensure_finite};
use crate::extensions::{ExtensionPoint, ExtensionRegistry};
use crate::geometry::{ArcSpan, NumericRange, Point2};
use crate::pipeline::{RenderStages, run_gauge_render_pipeline};
use crate::render::RenderContext;
use crate::surface::{Canvas, RenderSurface};
use crate::ticks::{Tick, TickOptions, generate_ticks};
use crate::trend::{Trend, ValueHistory};
use crate::styles::{CENTERED, LABEL_FONT, value_font_for_width};
use crate::widgets::primitives::{draw_label, draw_trend_arrow, draw_value_text};

pub use animated::{AnimatedGauge, shortest_heading_delta};
pub use bargraph::BargraphAdapter;
pub use compass::CompassAdapter;
pub use linear::LinearAdapter;
pub use radial::RadialAdapter;
pub use wind_rose::WindRoseAdapter;

/// Buffer key of the cached frame layer.
pub const FRAME_LAYER: &str = "frame";

/// Buffer key of the cached background layer.
pub const BACKGROUND_LAYER: &str = "background";

/// Ticks on heading scales: majors every 30°, minors every 10°.
const HEADING_TICKS: TickOptions = TickOptions { major_tick_count: 13, minor_ticks_per_major: 2, include_bounds: true };

/// Extensions attached to a gauge see its configuration.
pub type GaugeExtensions<C> = ExtensionRegistry<GaugeConfig, C>;

// =============================================================================
// Kinds & Results
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GaugeKind {
    Radial,
    Linear,
    Bargraph,
    Compass,
    WindRose,
}

impl GaugeKind {
    /// Compass-style gauges read headings instead of values.
    pub const fn is_heading(self) -> bool { matches!(self, Self::Compass | Self::WindRose) }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Radial => "radial",
            Self::Linear => "linear",
            Self::Bargraph => "bargraph",
            Self::Compass => "compass",
            Self::WindRose => "wind-rose",
        }
    }

    /// Range, arc and tick layout for this kind under `config`.
    fn scale(
        self,
        config: &GaugeConfig,
    ) -> Result<(NumericRange, ArcSpan, TickOptions)> {
        if self.is_heading() {
            Ok((NumericRange::new(0.0, 360.0)?, ArcSpan::from_degrees(-90.0, 360.0)?, HEADING_TICKS))
        } else {
            Ok((config.range()?, config.arc()?, config.tick_options()?))
        }
    }
}

/// What a render showed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading {
    Value(f64),
    /// Degrees in `[0, 360)`.
    Heading(f64),
}

impl Reading {
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Value(v) | Self::Heading(v) => v,
        }
    }
}

/// Derived state of one rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    pub reading: Reading,
    pub tone: Tone,
    /// Matched alerts, in resolution order.
    pub active_alerts: Vec<ActiveAlert>,
    pub trend: Option<Trend>,
}

// =============================================================================
// Scene & Adapter
// =============================================================================

/// Everything an adapter needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct GaugeScene<'a> {
    pub config: &'a GaugeConfig,
    pub palette: &'a Palette,
    pub range: NumericRange,
    pub arc: ArcSpan,
    pub ticks: &'a [Tick],
    /// Displayed value; headings already wrapped into `[0, 360)`.
    pub value: f64,
    pub tone: Tone,
    pub active_alerts: &'a [ActiveAlert],
    pub size: Size,
}

impl GaugeScene<'_> {
    /// Center of the drawing area.
    pub fn center(&self) -> Point { Point::new((self.size.width / 2) as i32, (self.size.height / 2) as i32) }

    pub fn center2(&self) -> Point2 { Point2::from(self.center()) }

    /// Largest radius that fits, minus a 2px margin.
    pub fn radius(&self) -> u32 { (self.size.width.min(self.size.height) / 2).saturating_sub(2).max(1) }

    /// Indicator color for the current tone.
    pub const fn tone_color(&self) -> Rgb565 { self.palette.tone_color(self.tone) }
}

/// Per-kind drawing. Every method draws one pipeline stage of one frame.
pub trait GaugeAdapter {
    fn kind(&self) -> GaugeKind;

    fn draw_frame<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()>;

    fn draw_background<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()>;

    fn draw_content<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()>;

    fn draw_foreground<C: Canvas>(
        &self,
        scene: &GaugeScene<'_>,
        surface: &mut RenderSurface<C>,
    ) -> Result<()>;
}

// =============================================================================
// Gauge
// =============================================================================

/// A configured gauge of one kind.
pub struct Gauge<A, C> {
    adapter: A,
    config: GaugeConfig,
    range: NumericRange,
    arc: ArcSpan,
    tick_options: TickOptions,
    palette: Palette,
    extensions: GaugeExtensions<C>,
    history: ValueHistory,
    /// Config or palette changed since the cached layers were drawn.
    layers_stale: bool,
}

impl<A: GaugeAdapter, C: Canvas> Gauge<A, C> {
    /// Validate `config` and build a gauge with the default palette.
    pub fn new(
        adapter: A,
        config: GaugeConfig,
    ) -> Result<Self> {
        config.validate()?;
        let (range, arc, tick_options) = adapter.kind().scale(&config)?;
        log::debug!("{} gauge `{}` created", adapter.kind().name(), config.title);
        Ok(Self {
            adapter,
            config,
            range,
            arc,
            tick_options,
            palette: Palette::default(),
            extensions: ExtensionRegistry::new(),
            history: ValueHistory::new(),
            layers_stale: false,
        })
    }

    #[must_use]
    pub fn with_palette(
        mut self,
        palette: Palette,
    ) -> Self {
        self.palette = palette;
        self.layers_stale = true;
        self
    }

    #[inline]
    pub fn kind(&self) -> GaugeKind { self.adapter.kind() }

    #[inline]
    pub const fn config(&self) -> &GaugeConfig { &self.config }

    #[inline]
    pub const fn range(&self) -> NumericRange { self.range }

    #[inline]
    pub const fn palette(&self) -> &Palette { &self.palette }

    /// Replace the configuration. Cached layers are redrawn on the next render.
    pub fn set_config(
        &mut self,
        config: GaugeConfig,
    ) -> Result<()> {
        config.validate()?;
        let (range, arc, tick_options) = self.kind().scale(&config)?;
        self.config = config;
        self.range = range;
        self.arc = arc;
        self.tick_options = tick_options;
        self.layers_stale = true;
        Ok(())
    }

    pub fn set_palette(
        &mut self,
        palette: Palette,
    ) {
        self.palette = palette;
        self.layers_stale = true;
    }

    #[inline]
    pub const fn extensions(&self) -> &GaugeExtensions<C> { &self.extensions }

    #[inline]
    pub fn extensions_mut(&mut self) -> &mut GaugeExtensions<C> { &mut self.extensions }

    #[inline]
    pub const fn history(&self) -> &ValueHistory { &self.history }

    /// Record a reading for trend detection.
    ///
    /// Headings are stored unwrapped: each sample continues from the previous
    /// one along the shortest rotation, so 350° then 10° records 350 and 370.
    pub fn record(
        &mut self,
        timestamp: f64,
        value: f64,
    ) {
        if !(timestamp.is_finite() && value.is_finite()) {
            return;
        }
        let value = match self.history.latest() {
            Some(last) if self.kind().is_heading() => last.value + shortest_heading_delta(last.value, value),
            _ => value,
        };
        self.history.push(timestamp, value);
    }

    fn reading_for(
        &self,
        value: f64,
    ) -> Reading {
        if self.kind().is_heading() { Reading::Heading(wrap_heading(value)) } else { Reading::Value(value) }
    }

    fn resolve_alerts(
        &self,
        reading: Reading,
    ) -> (Vec<ActiveAlert>, Tone) {
        match reading {
            Reading::Heading(heading) => {
                let matched =
                    resolve_gauge_heading_alerts(heading, &self.config.heading_alerts, self.config.heading_tolerance);
                let tone = resolve_gauge_tone_from_alerts(matched.iter().copied(), false);
                (matched.into_iter().map(ActiveAlert::from_alert).collect(), tone)
            }
            Reading::Value(value) => {
                let matched = resolve_gauge_value_alerts(value, &self.config.alerts);
                let tone = resolve_gauge_tone_from_alerts(matched.iter().copied(), self.config.threshold_breached(value));
                (matched.into_iter().map(ActiveAlert::from_alert).collect(), tone)
            }
        }
    }

    /// Draw one frame of `value` onto `ctx` and report what was shown.
    ///
    /// Fails with [`GaugeError::InvalidNumericInput`](crate::GaugeError) for a
    /// non-finite value, or with the first error raised by a stage.
    pub fn render(
        &mut self,
        ctx: &mut RenderContext<C>,
        value: f64,
    ) -> Result<RenderResult> {
        ensure_finite("value", value)?;
        let kind = self.kind();
        let reading = self.reading_for(value);
        let shown = reading.as_f64();
        let (active_alerts, tone) = self.resolve_alerts(reading);

        let visibility = &self.config.visibility;
        let ticks = if visibility.ticks { generate_ticks(&self.range, &self.tick_options)? } else { Vec::new() };
        let trend = if visibility.trend { self.history.trend(&self.config.trend)? } else { None };

        if self.layers_stale {
            ctx.layers_mut().invalidate();
            self.layers_stale = false;
        }
        let main = ctx.main_mut();
        main.set_clear_color(self.palette.background);
        main.clear();

        let scene = GaugeScene {
            config: &self.config,
            palette: &self.palette,
            range: self.range,
            arc: self.arc,
            ticks: &ticks,
            value: shown,
            tone,
            active_alerts: &active_alerts,
            size: ctx.size(),
        };
        let adapter = &self.adapter;
        let extensions = &self.extensions;
        let config = &self.config;

        let mut stages = RenderStages::new()
            .content(|ctx: &mut RenderContext<C>| {
                adapter.draw_content(&scene, ctx.main_mut())?;
                extensions.render_point(ExtensionPoint::Overlay, kind, config, shown, ctx.main_mut())?;
                extensions.render_point(ExtensionPoint::Marker, kind, config, shown, ctx.main_mut())
            })
            .foreground(|ctx: &mut RenderContext<C>| {
                adapter.draw_foreground(&scene, ctx.main_mut())?;
                if let Some(trend) = trend {
                    let x = scene.size.width as i32 - 10;
                    draw_trend_arrow(ctx.main_mut().canvas_mut(), x, 10, trend, scene.palette.text);
                }
                extensions.render_point(ExtensionPoint::Needle, kind, config, shown, ctx.main_mut())
            });
        if visibility.frame {
            stages = stages.frame(|ctx: &mut RenderContext<C>| {
                draw_cached_layer(ctx, FRAME_LAYER, |s| adapter.draw_frame(&scene, s))
            });
        }
        if visibility.background {
            stages = stages.background(|ctx: &mut RenderContext<C>| {
                draw_cached_layer(ctx, BACKGROUND_LAYER, |s| adapter.draw_background(&scene, s))
            });
        }

        run_gauge_render_pipeline(ctx, stages)?;
        ctx.layers_mut().end_frame();

        Ok(RenderResult { reading, tone, active_alerts, trend })
    }
}

/// Wrap a heading into `[0, 360)`.
///
/// `rem_euclid` rounds tiny negative inputs up to exactly 360 and keeps the
/// sign of `-0.0`; both come back as `0.0`.
pub fn wrap_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(360.0);
    if wrapped >= 360.0 || wrapped == 0.0 { 0.0 } else { wrapped }
}

/// Draw `key` into its buffer if it is stale, then blit it onto the main surface.
fn draw_cached_layer<C: Canvas>(
    ctx: &mut RenderContext<C>,
    key: &str,
    draw: impl FnOnce(&mut RenderSurface<C>) -> Result<()>,
) -> Result<()> {
    if ctx.layers().need_layer(key) {
        let buffer = ctx.get_buffer_surface(key)?;
        buffer.clear();
        draw(buffer)?;
        ctx.layers_mut().mark_layer_drawn(key);
        log::trace!("layer `{key}` redrawn");
    }
    ctx.blit_buffer(key)
}

/// `radius` shrunk by `by`, never below the center.
pub(crate) fn inset(
    radius: f64,
    by: f64,
) -> f64 {
    (radius - by).max(0.0)
}

// =============================================================================
// Shared Text Helpers
// =============================================================================

/// Title centered on `position`, if visible and the surface renders text.
pub(crate) fn draw_title<C: Canvas>(
    scene: &GaugeScene<'_>,
    surface: &mut RenderSurface<C>,
    position: Point,
) {
    let config = scene.config;
    if config.visibility.title && !config.title.is_empty() && surface.capabilities().text {
        draw_label(surface.canvas_mut(), &config.title, position, LABEL_FONT, scene.palette.text, CENTERED);
    }
}

/// Value readout centered on `position`, if visible and the surface renders text.
pub(crate) fn draw_readout<C: Canvas>(
    scene: &GaugeScene<'_>,
    surface: &mut RenderSurface<C>,
    position: Point,
) -> Result<()> {
    let config = scene.config;
    if !(config.visibility.value && surface.capabilities().text) {
        return Ok(());
    }
    let font = value_font_for_width(scene.size.width);
    draw_value_text(surface.canvas_mut(), position, scene.value, config.decimals, &config.unit, font, scene.palette.text)
}

/// Whether scale numbers should be drawn onto `surface`.
pub(crate) fn labels_visible<C: Canvas>(
    scene: &GaugeScene<'_>,
    surface: &RenderSurface<C>,
) -> bool {
    scene.config.visibility.labels && surface.capabilities().text
}

/// Scale number for a major tick: integers without decimals, otherwise one.
/// Magnitudes from a million up use exponent notation (`2.5e9`).
pub(crate) fn tick_label(value: f64) -> Result<heapless::String<24>> {
    let mut s = heapless::String::new();
    let written = if value.abs() >= 1e6 {
        write!(s, "{value:.1e}")
    } else if value.fract() == 0.0 {
        write!(s, "{value:.0}")
    } else {
        write!(s, "{value:.1}")
    };
    written.map_err(|_| GaugeError::TextOverflow { capacity: 24 })?;
    Ok(s)
}


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::alerts::{AlertSeverity, HeadingAlert, ValueAlert};
    use crate::error::GaugeError;
    use crate::extensions::GaugeExtension;
    use crate::surface::test_support::CountingCanvas;
    use crate::surface::{PixelCanvas, pixel_canvas_factory};

    /// Adapter that records stage calls and paints marker pixels.
    #[derive(Default)]
    struct RecordingAdapter {
        kind: Option<GaugeKind>,
        calls: Rc<RefCell<Vec<&'static str>>>,
        frames_drawn: Rc<Cell<u32>>,
    }

    impl GaugeAdapter for RecordingAdapter {
        fn kind(&self) -> GaugeKind { self.kind.unwrap_or(GaugeKind::Radial) }

        fn draw_frame<C: Canvas>(
            &self,
            _scene: &GaugeScene<'_>,
            surface: &mut RenderSurface<C>,
        ) -> Result<()> {
            self.calls.borrow_mut().push("frame");
            self.frames_drawn.set(self.frames_drawn.get() + 1);
            surface.canvas_mut().draw_iter([Pixel(Point::new(0, 0), Rgb565::RED)]).ok();
            Ok(())
        }

        fn draw_background<C: Canvas>(
            &self,
            _scene: &GaugeScene<'_>,
            _surface: &mut RenderSurface<C>,
        ) -> Result<()> {
            self.calls.borrow_mut().push("background");
            Ok(())
        }

        fn draw_content<C: Canvas>(
            &self,
            _scene: &GaugeScene<'_>,
            _surface: &mut RenderSurface<C>,
        ) -> Result<()> {
            self.calls.borrow_mut().push("content");
            Ok(())
        }

        fn draw_foreground<C: Canvas>(
            &self,
            _scene: &GaugeScene<'_>,
            _surface: &mut RenderSurface<C>,
        ) -> Result<()> {
            self.calls.borrow_mut().push("foreground");
            Ok(())
        }
    }

    fn context() -> RenderContext<PixelCanvas> {
        RenderContext::new(40, 40, pixel_canvas_factory(), pixel_canvas_factory()).unwrap()
    }

    fn recording() -> (RecordingAdapter, Rc<RefCell<Vec<&'static str>>>, Rc<Cell<u32>>) {
        let adapter = RecordingAdapter::default();
        let calls = Rc::clone(&adapter.calls);
        let frames = Rc::clone(&adapter.frames_drawn);
        (adapter, calls, frames)
    }

    fn value_alert(
        id: &str,
        value: f64,
        severity: AlertSeverity,
    ) -> ValueAlert {
        ValueAlert { id: id.into(), value, message: id.to_uppercase(), severity }
    }

    // -------------------------------------------------------------------------
    // Pipeline & Caching Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_render_runs_stages_in_order() {
        let (adapter, calls, _) = recording();
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();
        let mut ctx = context();
        gauge.render(&mut ctx, 10.0).unwrap();
        assert_eq!(*calls.borrow(), vec!["frame", "background", "content", "foreground"]);
    }

    #[test]
    fn test_static_layers_are_cached_between_frames() {
        let (adapter, _, frames) = recording();
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();
        let mut ctx = context();

        gauge.render(&mut ctx, 10.0).unwrap();
        gauge.render(&mut ctx, 20.0).unwrap();
        gauge.render(&mut ctx, 30.0).unwrap();
        assert_eq!(frames.get(), 1, "frame layer drawn once");
        assert_eq!(ctx.main().canvas().pixel(Point::zero()), Some(Rgb565::RED), "cached layer still blitted");

        ctx.resize(50, 50).unwrap();
        gauge.render(&mut ctx, 30.0).unwrap();
        assert_eq!(frames.get(), 2, "resize forces a redraw");

        gauge.set_config(GaugeConfig { title: "NEW".into(), ..GaugeConfig::default() }).unwrap();
        gauge.render(&mut ctx, 30.0).unwrap();
        assert_eq!(frames.get(), 3, "config change forces a redraw");
    }

    #[test]
    fn test_hidden_frame_skips_stage() {
        let (adapter, calls, _) = recording();
        let mut config = GaugeConfig::default();
        config.visibility.frame = false;
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, config).unwrap();
        gauge.render(&mut context(), 10.0).unwrap();
        assert_eq!(*calls.borrow(), vec!["background", "content", "foreground"]);
    }

    #[test]
    fn test_render_clears_main_once_per_frame() {
        let clears = Rc::new(Cell::new(0));
        let mut ctx =
            RenderContext::new(20, 20, CountingCanvas::factory(&clears), CountingCanvas::factory(&clears)).unwrap();
        let (adapter, _, _) = recording();
        let mut gauge: Gauge<_, CountingCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();

        gauge.render(&mut ctx, 1.0).unwrap();
        clears.set(0);
        gauge.render(&mut ctx, 2.0).unwrap();
        assert_eq!(clears.get(), 1, "cached layers are not cleared again");
    }

    // -------------------------------------------------------------------------
    // Derived State Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_render_rejects_non_finite_value() {
        let (adapter, calls, _) = recording();
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();
        let err = gauge.render(&mut context(), f64::NAN).unwrap_err();
        assert!(matches!(err, GaugeError::InvalidNumericInput { name: "value", .. }));
        assert!(calls.borrow().is_empty(), "nothing drawn");
    }

    #[test]
    fn test_value_alerts_and_tone() {
        let config = GaugeConfig {
            alerts: vec![value_alert("warm", 60.0, AlertSeverity::Warning), value_alert("hot", 90.0, AlertSeverity::Critical)],
            threshold: Some(50.0),
            ..GaugeConfig::default()
        };
        let (adapter, _, _) = recording();
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, config).unwrap();
        let mut ctx = context();

        assert_eq!(gauge.render(&mut ctx, 40.0).unwrap().tone, Tone::Accent);
        assert_eq!(gauge.render(&mut ctx, 55.0).unwrap().tone, Tone::Warning, "threshold breached");

        let hot = gauge.render(&mut ctx, 95.0).unwrap();
        assert_eq!(hot.tone, Tone::Danger);
        let ids: Vec<&str> = hot.active_alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["hot", "warm"], "highest threshold first");
        assert_eq!(hot.reading, Reading::Value(95.0));
    }

    #[test]
    fn test_heading_gauge_wraps_and_matches_heading_alerts() {
        let config = GaugeConfig {
            heading_alerts: vec![HeadingAlert {
                id: "north".into(),
                heading: 0.0,
                message: "Due north".into(),
                severity: AlertSeverity::Warning,
            }],
            ..GaugeConfig::default()
        };
        let adapter = RecordingAdapter { kind: Some(GaugeKind::Compass), ..RecordingAdapter::default() };
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, config).unwrap();
        assert_eq!(gauge.range().max(), 360.0, "heading gauges ignore min/max");

        let result = gauge.render(&mut context(), 725.0).unwrap();
        assert_eq!(result.reading, Reading::Heading(5.0));
        assert_eq!(result.tone, Tone::Warning);
        assert_eq!(result.active_alerts.len(), 1);
    }

    #[test]
    fn test_heading_wrap_stays_below_360() {
        assert_eq!(wrap_heading(-1e-14), 0.0, "rem_euclid alone gives 360");
        assert!(wrap_heading(-0.0).is_sign_positive());
        assert_eq!(wrap_heading(360.0), 0.0);
        assert_eq!(wrap_heading(-90.0), 270.0);

        let adapter = RecordingAdapter { kind: Some(GaugeKind::Compass), ..RecordingAdapter::default() };
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();
        let result = gauge.render(&mut context(), -1e-14).unwrap();
        assert_eq!(result.reading, Reading::Heading(0.0));
    }

    #[test]
    fn test_main_surface_clears_to_palette_background() {
        let (adapter, _, _) = recording();
        let palette = Palette { background: Rgb565::BLUE, ..Palette::default() };
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap().with_palette(palette);
        let mut ctx = context();
        gauge.render(&mut ctx, 1.0).unwrap();
        assert_eq!(ctx.main().canvas().pixel(Point::new(39, 39)), Some(Rgb565::BLUE));

        gauge.set_palette(Palette::default());
        gauge.render(&mut ctx, 1.0).unwrap();
        assert_eq!(ctx.main().canvas().pixel(Point::new(39, 39)), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_trend_from_recorded_history() {
        let (adapter, _, _) = recording();
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();
        let mut ctx = context();
        assert_eq!(gauge.render(&mut ctx, 0.0).unwrap().trend, None);

        gauge.record(0.0, 10.0);
        gauge.record(1_000.0, 20.0);
        assert_eq!(gauge.render(&mut ctx, 20.0).unwrap().trend, Some(Trend::Up));
    }

    #[test]
    fn test_heading_history_unwraps_through_north() {
        let adapter = RecordingAdapter { kind: Some(GaugeKind::Compass), ..RecordingAdapter::default() };
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();
        gauge.record(0.0, 350.0);
        gauge.record(1_000.0, 10.0);
        let values: Vec<f64> = gauge.history().samples().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![350.0, 370.0]);
        assert_eq!(gauge.render(&mut context(), 10.0).unwrap().trend, Some(Trend::Up), "clockwise through north");

        gauge.record(2_000.0, 340.0);
        assert_eq!(gauge.history().latest().map(|s| s.value), Some(340.0), "30 degrees back");
    }

    #[test]
    fn test_tick_labels_fit_any_magnitude() {
        assert_eq!(tick_label(50.0).unwrap().as_str(), "50");
        assert_eq!(tick_label(-2.5).unwrap().as_str(), "-2.5");
        assert_eq!(tick_label(2.5e9).unwrap().as_str(), "2.5e9");
        assert_eq!(tick_label(-1e300).unwrap().as_str(), "-1.0e300");
    }

    // -------------------------------------------------------------------------
    // Small Gauge Tests
    // -------------------------------------------------------------------------

    /// Render every kind once at `size` x `size` with alerts and a threshold set.
    fn render_all_kinds(size: u32) -> Vec<(GaugeKind, Result<RenderResult>)> {
        fn render<A: GaugeAdapter>(
            adapter: A,
            config: GaugeConfig,
            value: f64,
        ) -> (GaugeKind, Result<RenderResult>) {
            let kind = adapter.kind();
            let result = RenderContext::new(config.width, config.height, pixel_canvas_factory(), pixel_canvas_factory())
                .and_then(|mut ctx| {
                    let mut gauge: Gauge<A, PixelCanvas> = Gauge::new(adapter, config)?;
                    gauge.render(&mut ctx, value)
                });
            (kind, result)
        }

        let config = GaugeConfig {
            width: size,
            height: size,
            title: "T".into(),
            unit: "u".into(),
            threshold: Some(70.0),
            heading_alerts: vec![HeadingAlert {
                id: "east".into(),
                heading: 90.0,
                message: "East".into(),
                severity: AlertSeverity::Critical,
            }],
            ..GaugeConfig::default()
        };
        config.validate().unwrap();
        vec![
            render(RadialAdapter, config.clone(), 50.0),
            render(LinearAdapter, config.clone(), 50.0),
            render(BargraphAdapter, config.clone(), 50.0),
            render(CompassAdapter, config.clone(), 90.0),
            render(WindRoseAdapter, config, 90.0),
        ]
    }

    #[test]
    fn test_every_kind_renders_at_small_sizes() {
        for size in [1, 2, 8, 16, 20, 24, 32] {
            for (kind, result) in render_all_kinds(size) {
                assert!(result.is_ok(), "{} gauge at {size}x{size}: {result:?}", kind.name());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Extension Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_extensions_run_at_their_points() {
        let (adapter, calls, _) = recording();
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();
        let needle_calls = Rc::clone(&calls);
        gauge
            .extensions_mut()
            .register(
                "needle",
                GaugeExtension::needle(move |_| {
                    needle_calls.borrow_mut().push("ext:needle");
                    Ok(())
                }),
            )
            .unwrap();
        let overlay_calls = Rc::clone(&calls);
        gauge
            .extensions_mut()
            .register(
                "overlay",
                GaugeExtension::overlay(move |ctx| {
                    assert_eq!(ctx.value, 42.0);
                    overlay_calls.borrow_mut().push("ext:overlay");
                    Ok(())
                }),
            )
            .unwrap();

        gauge.render(&mut context(), 42.0).unwrap();
        assert_eq!(
            *calls.borrow(),
            vec!["frame", "background", "content", "ext:overlay", "foreground", "ext:needle"]
        );
    }

    #[test]
    fn test_failing_extension_aborts_render() {
        let (adapter, calls, _) = recording();
        let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(adapter, GaugeConfig::default()).unwrap();
        gauge
            .extensions_mut()
            .register("broken", GaugeExtension::marker(|_| Err(GaugeError::EmptyExtensionId)))
            .unwrap();
        assert!(gauge.render(&mut context(), 1.0).is_err());
        assert!(!calls.borrow().contains(&"foreground"), "foreground never runs after a failed stage");
    }
}
