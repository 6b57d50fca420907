#![allow(clippy::cast_possible_truncation)] // f64->i32 pixel offsets
#![allow(clippy::cast_precision_loss)] // frame counter -> f64 signal time

//! Desktop preview of all five gauge kinds.
//!
//! Each gauge renders into its own `SimulatorDisplay`-backed context; the main
//! loop polls the frame clock (which advances every running animation), then
//! blits each gauge's main surface into its cell of the window.
//!
//! ```text
//! +-----------+-----------+-----------+
//! |  RADIAL   |  COMPASS  | WIND ROSE |
//! +-----------+-----------+-----------+
//! |  LINEAR   |      BARGRAPH         |
//! +-----------+-----------------------+
//! ```
//!
//! Usage: `cargo run --features simulator [radial.toml]`. The optional file
//! replaces the radial gauge's configuration.
//!
//! Keys: `Space` toggles animation, `Q` quits.

use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use instrument_gauges::colors::{BLACK, TRANSPARENT_KEY};
use instrument_gauges::config::ScaleSettings;
use instrument_gauges::widgets::primitives::blit;
use instrument_gauges::{
    AlertSeverity,
    AnimatedGauge,
    AnimationScheduler,
    BargraphAdapter,
    Clock,
    CompassAdapter,
    FrameClock,
    Gauge,
    GaugeAdapter,
    GaugeConfig,
    HeadingAlert,
    LinearAdapter,
    RadialAdapter,
    RenderContext,
    ValueAlert,
    WindRoseAdapter,
};

type Display = SimulatorDisplay<Rgb565>;

const SCREEN_WIDTH: u32 = 600;
const SCREEN_HEIGHT: u32 = 400;
const CELL: i32 = 200;

/// Target frame time (~60 FPS).
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Frames between new demo readings.
const READING_INTERVAL: u32 = 45;

/// Object-safe view of an animated gauge for the demo grid.
trait LiveGauge {
    fn set_value(
        &mut self,
        value: f64,
    );

    fn set_animation(
        &mut self,
        enabled: bool,
    );

    fn blit_into(
        &self,
        display: &mut Display,
        offset: Point,
    );
}

impl<A: GaugeAdapter + 'static> LiveGauge for AnimatedGauge<A, Display> {
    fn set_value(
        &mut self,
        value: f64,
    ) {
        if let Err(err) = AnimatedGauge::set_value(self, value) {
            log::warn!("set_value({value:.2}) failed: {err}");
        }
    }

    fn set_animation(
        &mut self,
        enabled: bool,
    ) {
        self.with_gauge_mut(|gauge| {
            let mut config = gauge.config().clone();
            config.animation.enabled = enabled;
            gauge.set_config(config)
        })
        .ok();
    }

    fn blit_into(
        &self,
        display: &mut Display,
        offset: Point,
    ) {
        self.with_context(|ctx| blit(ctx.main().canvas(), display, offset, TRANSPARENT_KEY));
    }
}

/// One demo cell: the gauge, where it sits and the signal driving it.
struct Cell {
    gauge: Box<dyn LiveGauge>,
    offset: Point,
    signal: fn(f64) -> f64,
}

/// Route `log` records to stderr. `RUST_LOG` overrides the default filter.
fn init_logging() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "instrument_gauges=info,simulator=info".to_owned());
    if let Err(err) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("logging disabled: {err}");
    }
}

fn display_factory(size: Size) -> Option<Display> { Some(Display::new(size)) }

fn live<A: GaugeAdapter + 'static>(
    adapter: A,
    config: GaugeConfig,
    scheduler: &AnimationScheduler,
) -> instrument_gauges::Result<Box<dyn LiveGauge>> {
    let context = RenderContext::new(config.width, config.height, display_factory, display_factory)?;
    let gauge = Gauge::new(adapter, config)?;
    let animated = AnimatedGauge::new(gauge, context, scheduler.clone());
    animated.render_now()?;
    Ok(Box::new(animated))
}

fn radial_config() -> GaugeConfig {
    if let Some(path) = std::env::args().nth(1) {
        match GaugeConfig::load_from_path(&path) {
            Ok(config) => return config,
            Err(err) => log::warn!("ignoring {path}: {err}"),
        }
    }
    GaugeConfig {
        title: "BOOST".into(),
        unit: "bar".into(),
        max: 2.5,
        decimals: 2,
        threshold: Some(1.8),
        scale: ScaleSettings { major_ticks: 6.0, ..ScaleSettings::default() },
        alerts: vec![ValueAlert {
            id: "overboost".into(),
            value: 2.2,
            message: "Overboost".into(),
            severity: AlertSeverity::Critical,
        }],
        ..GaugeConfig::default()
    }
}

fn build_cells(scheduler: &AnimationScheduler) -> instrument_gauges::Result<Vec<Cell>> {
    let compass = GaugeConfig {
        title: "HDG".into(),
        heading_alerts: vec![HeadingAlert {
            id: "north".into(),
            heading: 0.0,
            message: "Due north".into(),
            severity: AlertSeverity::Info,
        }],
        ..GaugeConfig::default()
    };
    let wind = GaugeConfig {
        title: "WIND".into(),
        heading_alerts: vec![HeadingAlert {
            id: "onshore".into(),
            heading: 270.0,
            message: "Onshore wind".into(),
            severity: AlertSeverity::Warning,
        }],
        ..GaugeConfig::default()
    };
    let oil = GaugeConfig {
        title: "OIL T".into(),
        unit: "C".into(),
        min: 40.0,
        max: 150.0,
        width: 80,
        threshold: Some(120.0),
        ..GaugeConfig::default()
    };
    let afr = GaugeConfig {
        title: "AFR".into(),
        min: 10.0,
        max: 18.0,
        width: 380,
        height: 160,
        decimals: 1,
        ..GaugeConfig::default()
    };

    Ok(vec![
        Cell {
            gauge: live(RadialAdapter, radial_config(), scheduler)?,
            offset: Point::zero(),
            signal: |t| fake_signal(t, 0.0, 2.4, 0.11),
        },
        Cell {
            gauge: live(CompassAdapter, compass, scheduler)?,
            offset: Point::new(CELL, 0),
            signal: |t| fake_signal(t, -120.0, 480.0, 0.03),
        },
        Cell {
            gauge: live(WindRoseAdapter, wind, scheduler)?,
            offset: Point::new(2 * CELL, 0),
            signal: |t| fake_signal(t, 180.0, 360.0, 0.05),
        },
        Cell {
            gauge: live(LinearAdapter, oil, scheduler)?,
            offset: Point::new(60, CELL),
            signal: |t| fake_signal(t, 60.0, 135.0, 0.08),
        },
        Cell {
            gauge: live(BargraphAdapter, afr, scheduler)?,
            offset: Point::new(CELL + 10, CELL + 20),
            signal: |t| fake_signal(t, 10.5, 17.5, 0.09),
        },
    ])
}

fn main() {
    init_logging();

    let clock = Rc::new(FrameClock::new());
    let shared: Rc<dyn Clock> = clock.clone();
    let scheduler = AnimationScheduler::new(shared);

    let mut cells = match build_cells(&scheduler) {
        Ok(cells) => cells,
        Err(err) => {
            log::error!("failed to build gauges: {err}");
            return;
        }
    };

    let mut display: Display = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Instrument Gauges", &output_settings);
    display.clear(BLACK).ok();

    // ==========================================================================
    // Main Render Loop
    // ==========================================================================

    let mut frame_count = 0u32;
    let mut animate = true;

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Q => return,
                        Keycode::Space => {
                            animate = !animate;
                            for cell in &mut cells {
                                cell.gauge.set_animation(animate);
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // New readings every READING_INTERVAL frames
        if frame_count % READING_INTERVAL == 0 {
            let t = f64::from(frame_count) / 10.0;
            for cell in &mut cells {
                cell.gauge.set_value((cell.signal)(t));
            }
        }

        // Fire due animation frames; each one re-renders its gauge
        clock.poll();

        for cell in &cells {
            cell.gauge.blit_into(&mut display, cell.offset);
        }
        window.update(&display);

        frame_count = frame_count.wrapping_add(1);
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            thread::sleep(FRAME_TIME - elapsed);
        }
    }
}

/// Sinusoidal demo signal oscillating between `min` and `max`.
fn fake_signal(
    t: f64,
    min: f64,
    max: f64,
    freq: f64,
) -> f64 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_keeps_first_logger() {
        init_logging();
        init_logging();
        log::info!("second init reports instead of panicking");
    }

    #[test]
    fn test_fake_signal_stays_in_bounds() {
        for frame in 0..500 {
            let value = fake_signal(f64::from(frame) / 10.0, 10.5, 17.5, 0.09);
            assert!((10.5..=17.5).contains(&value), "frame {frame}: {value}");
        }
    }
}
