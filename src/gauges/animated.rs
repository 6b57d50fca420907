//! Animated gauge: a [`Gauge`] bound to its render context and a scheduler.
//!
//! [`AnimatedGauge::set_value`] is the whole public surface of a live gauge.
//! It records the target for trend detection, cancels any run in flight and
//! eases the displayed value towards the target, rendering every frame:
//!
//! ```text
//! set_value(t) --record--> history
//!      |--cancel--> previous run
//!      \--run(displayed -> t)--> on_update: displayed = sample.value; render
//! ```
//!
//! With animation disabled the target is rendered immediately. Heading gauges
//! take the short way round (350° -> 10° sweeps through north).
//!
//! Frame render errors do not stop the run: they are logged and kept in
//! [`AnimatedGauge::last_error`] until the next successful frame.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Gauge, GaugeAdapter, RenderResult};
use crate::error::{GaugeError, Result, ensure_finite};
use crate::render::RenderContext;
use crate::scheduler::{AnimationConfig, AnimationRunHandle, AnimationScheduler};
use crate::surface::Canvas;

/// Signed shortest rotation from heading `from` to heading `to` (`-180..180`).
pub fn shortest_heading_delta(
    from: f64,
    to: f64,
) -> f64 {
    (to - from + 540.0).rem_euclid(360.0) - 180.0
}

struct LiveState<A, C> {
    gauge: Gauge<A, C>,
    context: RenderContext<C>,
    displayed: f64,
    last_result: Option<RenderResult>,
    last_error: Option<GaugeError>,
}

impl<A: GaugeAdapter, C: Canvas> LiveState<A, C> {
    fn render_displayed(&mut self) -> Result<RenderResult> {
        match self.gauge.render(&mut self.context, self.displayed) {
            Ok(result) => {
                self.last_result = Some(result.clone());
                self.last_error = None;
                Ok(result)
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

/// A gauge that animates towards every new value.
pub struct AnimatedGauge<A, C> {
    state: Rc<RefCell<LiveState<A, C>>>,
    scheduler: AnimationScheduler,
    active: Option<AnimationRunHandle>,
}

impl<A, C> AnimatedGauge<A, C>
where
    A: GaugeAdapter + 'static,
    C: Canvas + 'static,
{
    /// The displayed value starts at the range minimum (north for headings).
    pub fn new(
        gauge: Gauge<A, C>,
        context: RenderContext<C>,
        scheduler: AnimationScheduler,
    ) -> Self {
        let displayed = if gauge.kind().is_heading() { 0.0 } else { gauge.range().min() };
        let state = LiveState { gauge, context, displayed, last_result: None, last_error: None };
        Self { state: Rc::new(RefCell::new(state)), scheduler, active: None }
    }

    /// Render the displayed value without animating (first paint, after config changes).
    pub fn render_now(&self) -> Result<RenderResult> { self.state.borrow_mut().render_displayed() }

    /// Move the gauge to `target`.
    ///
    /// Fails on a non-finite target, an invalid easing or animation timing, or
    /// (animation disabled only) a render error.
    pub fn set_value(
        &mut self,
        target: f64,
    ) -> Result<()> {
        ensure_finite("value", target)?;
        self.cancel();

        let (from, to, config) = {
            let mut state = self.state.borrow_mut();
            state.gauge.record(self.scheduler.clock().now(), target);

            let settings = state.gauge.config().animation.clone();
            if !settings.enabled {
                state.displayed = target;
                return state.render_displayed().map(|_| ());
            }

            let (from, to) = if state.gauge.kind().is_heading() {
                let from = state.displayed.rem_euclid(360.0);
                (from, from + shortest_heading_delta(from, target))
            } else {
                (state.displayed, target)
            };
            let config = AnimationConfig::new(from, to, settings.duration_ms)
                .easing(state.gauge.config().easing()?)
                .frame_ms(settings.frame_ms);
            (from, to, config)
        };

        let state = Rc::clone(&self.state);
        let config = config.on_update(move |sample| {
            let mut state = state.borrow_mut();
            state.displayed = sample.value;
            if let Err(err) = state.render_displayed() {
                log::warn!("frame render failed at {:.2}: {err}", sample.value);
            }
        });
        log::debug!("animating {from:.2} -> {to:.2}");
        self.active = Some(self.scheduler.run(config)?);
        Ok(())
    }

    /// Stop the current run, leaving the displayed value where it is.
    pub fn cancel(&mut self) {
        if let Some(run) = self.active.take() {
            run.cancel();
        }
    }

    pub fn is_animating(&self) -> bool { self.active.as_ref().is_some_and(AnimationRunHandle::is_running) }

    /// Value shown by the last frame. Headings may lie outside `0..360`.
    pub fn displayed_value(&self) -> f64 { self.state.borrow().displayed }

    pub fn last_result(&self) -> Option<RenderResult> { self.state.borrow().last_result.clone() }

    /// Error of the last frame, cleared by the next successful one.
    pub fn last_error(&self) -> Option<GaugeError> { self.state.borrow().last_error.clone() }

    /// Read access to the render context (e.g. to blit the main surface).
    pub fn with_context<R>(
        &self,
        f: impl FnOnce(&RenderContext<C>) -> R,
    ) -> R {
        f(&self.state.borrow().context)
    }

    /// Mutable access to the gauge (configuration, palette, extensions).
    pub fn with_gauge_mut<R>(
        &self,
        f: impl FnOnce(&mut Gauge<A, C>) -> R,
    ) -> R {
        f(&mut self.state.borrow_mut().gauge)
    }

    /// Resize the render context and repaint.
    pub fn resize(
        &self,
        width: u32,
        height: u32,
    ) -> Result<RenderResult> {
        let mut state = self.state.borrow_mut();
        state.context.resize(width, height)?;
        state.render_displayed()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::config::GaugeConfig;
    use crate::extensions::GaugeExtension;
    use crate::gauges::{CompassAdapter, RadialAdapter, Reading};
    use crate::surface::{PixelCanvas, pixel_canvas_factory};
    use crate::trend::Trend;

    fn config() -> GaugeConfig {
        let mut config = GaugeConfig { width: 60, height: 60, ..GaugeConfig::default() };
        config.animation.duration_ms = 100.0;
        config.animation.frame_ms = 10.0;
        config.animation.easing = "linear".into();
        config
    }

    fn animated<A: GaugeAdapter + 'static>(
        adapter: A,
        config: GaugeConfig,
    ) -> (Rc<ManualClock>, AnimatedGauge<A, PixelCanvas>) {
        let clock = Rc::new(ManualClock::new());
        let shared: Rc<dyn Clock> = clock.clone();
        let context =
            RenderContext::new(config.width, config.height, pixel_canvas_factory(), pixel_canvas_factory()).unwrap();
        let gauge = Gauge::new(adapter, config).unwrap();
        (clock, AnimatedGauge::new(gauge, context, AnimationScheduler::new(shared)))
    }

    fn reading(gauge: &AnimatedGauge<impl GaugeAdapter + 'static, PixelCanvas>) -> Reading {
        gauge.last_result().unwrap().reading
    }

    // -------------------------------------------------------------------------
    // Animation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_set_value_animates_to_target() {
        let (clock, mut gauge) = animated(RadialAdapter, config());
        gauge.set_value(80.0).unwrap();
        assert!(gauge.is_animating());
        assert_eq!(reading(&gauge), Reading::Value(0.0), "first frame shows the start value");

        clock.advance(50.0);
        assert_eq!(gauge.displayed_value(), 40.0);

        clock.advance(50.0);
        assert!(!gauge.is_animating());
        assert_eq!(reading(&gauge), Reading::Value(80.0));
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_retarget_starts_from_displayed_value() {
        let (clock, mut gauge) = animated(RadialAdapter, config());
        gauge.set_value(100.0).unwrap();
        clock.advance(30.0);
        assert_eq!(gauge.displayed_value(), 30.0);

        gauge.set_value(0.0).unwrap();
        assert_eq!(reading(&gauge), Reading::Value(30.0), "no jump on retarget");
        assert_eq!(clock.pending(), 1, "previous run cancelled");

        clock.advance(50.0);
        assert_eq!(gauge.displayed_value(), 15.0);
        clock.advance(50.0);
        assert_eq!(gauge.displayed_value(), 0.0);
    }

    #[test]
    fn test_disabled_animation_renders_immediately() {
        let mut config = config();
        config.animation.enabled = false;
        let (clock, mut gauge) = animated(RadialAdapter, config);
        gauge.set_value(64.0).unwrap();
        assert!(!gauge.is_animating());
        assert_eq!(clock.pending(), 0);
        assert_eq!(reading(&gauge), Reading::Value(64.0));
    }

    #[test]
    fn test_heading_takes_short_way_round() {
        let (clock, mut gauge) = animated(CompassAdapter, config());
        gauge.set_value(350.0).unwrap();
        clock.advance(100.0);
        assert_eq!(reading(&gauge), Reading::Heading(350.0));
        assert_eq!(gauge.displayed_value(), -10.0);

        gauge.set_value(10.0).unwrap();
        clock.advance(50.0);
        assert_eq!(reading(&gauge), Reading::Heading(0.0), "halfway is north, not south");
        clock.advance(50.0);
        assert_eq!(reading(&gauge), Reading::Heading(10.0));
    }

    #[test]
    fn test_shortest_heading_delta() {
        assert_eq!(shortest_heading_delta(350.0, 10.0), 20.0);
        assert_eq!(shortest_heading_delta(10.0, 350.0), -20.0);
        assert_eq!(shortest_heading_delta(0.0, 90.0), 90.0);
        assert_eq!(shortest_heading_delta(90.0, 90.0), 0.0);
    }

    // -------------------------------------------------------------------------
    // Error & History Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_non_finite_target_is_rejected() {
        let (clock, mut gauge) = animated(RadialAdapter, config());
        assert!(matches!(gauge.set_value(f64::INFINITY), Err(GaugeError::InvalidNumericInput { .. })));
        assert!(gauge.last_result().is_none());
        assert_eq!(clock.pending(), 0);
        gauge.with_gauge_mut(|g| assert!(g.history().is_empty()));
    }

    #[test]
    fn test_frame_errors_are_kept_and_run_continues() {
        let (clock, mut gauge) = animated(RadialAdapter, config());
        gauge.with_gauge_mut(|g| {
            g.extensions_mut()
                .register(
                    "limit",
                    GaugeExtension::overlay(|ctx| {
                        if ctx.value > 50.0 { Err(GaugeError::Config("over limit".into())) } else { Ok(()) }
                    }),
                )
                .unwrap();
        });

        gauge.set_value(100.0).unwrap();
        clock.advance(40.0);
        assert!(gauge.last_error().is_none());

        clock.advance(60.0);
        assert!(!gauge.is_animating(), "run completes despite errors");
        assert_eq!(gauge.last_error(), Some(GaugeError::Config("over limit".into())));
        assert_eq!(reading(&gauge), Reading::Value(50.0), "last good frame");

        gauge.set_value(20.0).unwrap();
        assert!(gauge.last_error().is_some(), "first frame of the new run is still over the limit");
        clock.advance(100.0);
        assert!(gauge.last_error().is_none());
    }

    #[test]
    fn test_targets_feed_trend() {
        let (clock, mut gauge) = animated(RadialAdapter, config());
        gauge.set_value(10.0).unwrap();
        clock.advance(1_000.0);
        gauge.set_value(60.0).unwrap();
        clock.advance(100.0);
        assert_eq!(gauge.last_result().unwrap().trend, Some(Trend::Up));
    }

    #[test]
    fn test_heading_trend_follows_rotation_through_north() {
        let (clock, mut gauge) = animated(CompassAdapter, config());
        gauge.set_value(350.0).unwrap();
        clock.advance(1_000.0);
        gauge.set_value(10.0).unwrap();
        clock.advance(100.0);
        let result = gauge.last_result().unwrap();
        assert_eq!(result.reading, Reading::Heading(10.0));
        assert_eq!(result.trend, Some(Trend::Up), "350 -> 10 is a 20 degree clockwise turn");
    }

    #[test]
    fn test_dropping_gauge_abandons_run() {
        let (clock, mut gauge) = animated(RadialAdapter, config());
        gauge.set_value(100.0).unwrap();
        drop(gauge);
        clock.advance(200.0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_resize_repaints() {
        let (_clock, gauge) = animated(RadialAdapter, config());
        let result = gauge.resize(90, 90).unwrap();
        assert_eq!(result.reading, Reading::Value(0.0));
        gauge.with_context(|ctx| assert_eq!(ctx.size().width, 90));
    }
}
