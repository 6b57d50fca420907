// Crate-level lints: Allow common graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional f64->i32, u32->i32 casts for pixel math
#![allow(clippy::cast_precision_loss)] // usize/u32->f64 in geometry calculations
#![allow(clippy::cast_possible_wrap)] // u32->i32 wrapping is acceptable for screen sizes
#![allow(clippy::cast_sign_loss)] // f64->u32 where we know the value is positive
#![allow(clippy::similar_names)] // from/to, min/max pairs are clear
#![allow(clippy::float_cmp)] // exact comparisons against configured constants

//! Animated instrument gauges for `embedded-graphics` draw targets.
//!
//! Five gauge kinds share one rendering engine:
//!
//! | Kind      | Indicator                         | Reads    |
//! |-----------|-----------------------------------|----------|
//! | Radial    | needle and value band on an arc   | value    |
//! | Linear    | pointer and track on a vertical   | value    |
//! | Bargraph  | lit segments of a horizontal bar  | value    |
//! | Compass   | needle on a 360° rose             | heading  |
//! | Wind rose | inward arrow, highlighted sector  | heading  |
//!
//! # Layers
//!
//! ```text
//! AnimatedGauge ── set_value ──> AnimationScheduler ── Clock (manual / frame)
//!      │                                │
//!      │                          Timeline + Easing
//!      v                                │ on_update
//! Gauge<Adapter> ── render ──> RenderContext (main + cached layer buffers)
//!      │                                │
//!      ├─ alerts, tone, trend            └─ run_gauge_render_pipeline
//!      └─ ExtensionRegistry                  frame > background > content > foreground
//! ```
//!
//! - Pure math ([`geometry`], [`ticks`], [`easing`], [`timeline`], [`trend`],
//!   [`alerts`]) validates its inputs and never touches a surface.
//! - Time only enters through the [`clock::Clock`] trait, so every animation
//!   can be stepped deterministically with [`clock::ManualClock`].
//! - Drawing goes through [`surface::Canvas`], any resizable `Rgb565`
//!   `DrawTarget`. [`surface::PixelCanvas`] is the headless implementation; the
//!   `simulator` feature adds the SDL window used by the demo binary.
//!
//! # Example
//!
//! ```
//! use instrument_gauges::{Gauge, GaugeConfig, RadialAdapter, RenderContext};
//! use instrument_gauges::surface::{PixelCanvas, pixel_canvas_factory};
//!
//! let config = GaugeConfig { title: "BOOST".into(), unit: "bar".into(), max: 2.5, ..GaugeConfig::default() };
//! let mut ctx = RenderContext::new(config.width, config.height, pixel_canvas_factory(), pixel_canvas_factory())?;
//! let mut gauge: Gauge<_, PixelCanvas> = Gauge::new(RadialAdapter, config)?;
//! let result = gauge.render(&mut ctx, 1.2)?;
//! assert_eq!(result.reading.as_f64(), 1.2);
//! # Ok::<(), instrument_gauges::GaugeError>(())
//! ```

pub mod alerts;
pub mod clock;
pub mod colors;
pub mod config;
pub mod easing;
pub mod error;
pub mod extensions;
pub mod gauges;
pub mod geometry;
pub mod pipeline;
pub mod render;
pub mod scheduler;
pub mod styles;
pub mod surface;
pub mod ticks;
pub mod timeline;
pub mod trend;
pub mod widgets;

pub use alerts::{ActiveAlert, AlertSeverity, HeadingAlert, Tone, ValueAlert};
pub use clock::{Clock, FrameClock, ManualClock};
pub use colors::Palette;
pub use config::GaugeConfig;
pub use easing::Easing;
pub use error::{GaugeError, Result};
pub use extensions::{ExtensionPoint, ExtensionRegistry, GaugeExtension};
pub use gauges::{
    AnimatedGauge,
    BargraphAdapter,
    CompassAdapter,
    Gauge,
    GaugeAdapter,
    GaugeKind,
    LinearAdapter,
    RadialAdapter,
    Reading,
    RenderResult,
    WindRoseAdapter,
};
pub use geometry::NumericRange;
pub use render::{RenderContext, create_render_context};
pub use scheduler::{AnimationConfig, AnimationRunHandle, AnimationScheduler};
pub use surface::{Canvas, RenderSurface};
pub use timeline::{Timeline, TimelineSample};
pub use trend::Trend;
