//! Render context: the main surface, lazily created offscreen buffers and the
//! draw-once state of cached layers.
//!
//! # Buffer Cache
//!
//! Buffers are keyed by caller-chosen names (`"frame"`, `"background"`, ...).
//! The first [`RenderContext::get_buffer_surface`] call for a key creates the
//! buffer at the current size; later calls return the same surface. Buffers
//! live until [`RenderContext::destroy`].
//!
//! # Static Layers
//!
//! Gauges draw their frame and background once into buffers and only blit them
//! on later frames. [`LayerState`] remembers which layers are current:
//!
//! | Event              | Effect on cached layers          |
//! |--------------------|----------------------------------|
//! | first frame        | every layer drawn                |
//! | `resize`           | every layer invalidated          |
//! | `clear_all`        | every layer invalidated          |
//! | `destroy`          | buffers dropped, layers redrawn  |
//! | config change      | caller invalidates               |
//!
//! # Update Strategy
//!
//! | Element            | Update Frequency     | Strategy            |
//! |--------------------|----------------------|---------------------|
//! | Frame / bezel      | Once / after resize  | Cached buffer blit  |
//! | Background / scale | Once / after resize  | Cached buffer blit  |
//! | Indicator, needle  | Every frame          | Always redraw       |

use std::collections::BTreeMap;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::colors::{BLACK, TRANSPARENT_KEY};
use crate::error::{GaugeError, Result};
use crate::surface::{Canvas, RenderSurface, SurfaceFactory};
use crate::widgets::primitives::blit;

// =============================================================================
// Layer State
// =============================================================================

/// Tracks which cached layers are up to date.
#[derive(Clone, Debug)]
pub struct LayerState {
    /// Keys drawn since the last invalidation.
    drawn: Vec<String>,

    /// Whether this is the first frame (need full redraw).
    first_frame: bool,

    /// Set by resize/clear until the next `end_frame`.
    invalidated: bool,
}

impl LayerState {
    pub const fn new() -> Self { Self { drawn: Vec::new(), first_frame: true, invalidated: false } }

    #[inline]
    pub const fn is_first_frame(&self) -> bool { self.first_frame }

    /// Whether `key` must be (re)drawn into its buffer this frame.
    pub fn need_layer(
        &self,
        key: &str,
    ) -> bool {
        self.first_frame || !self.drawn.iter().any(|k| k == key)
    }

    pub fn mark_layer_drawn(
        &mut self,
        key: &str,
    ) {
        if !self.drawn.iter().any(|k| k == key) {
            self.drawn.push(key.to_owned());
        }
    }

    /// Forget every drawn layer.
    pub fn invalidate(&mut self) {
        self.drawn.clear();
        self.invalidated = true;
    }

    /// Whether layers were invalidated since the last `end_frame`.
    #[inline]
    pub const fn was_invalidated(&self) -> bool { self.invalidated }

    /// Call at end of frame to reset per-frame flags.
    pub const fn end_frame(&mut self) {
        self.first_frame = false;
        self.invalidated = false;
    }
}

impl Default for LayerState {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Render Context
// =============================================================================

/// One main surface plus keyed offscreen buffers of the same size.
pub struct RenderContext<C> {
    size: Size,
    main: RenderSurface<C>,
    buffers: BTreeMap<String, RenderSurface<C>>,
    offscreen_factory: Box<dyn SurfaceFactory<C>>,
    layers: LayerState,
}

fn validate_dimensions(
    width: u32,
    height: u32,
) -> Result<Size> {
    if width == 0 || height == 0 {
        return Err(GaugeError::DimensionInvalid { width, height });
    }
    Ok(Size::new(width, height))
}

impl<C: Canvas> RenderContext<C> {
    /// Validate dimensions and build the main surface eagerly.
    ///
    /// The main surface clears to black; see [`RenderContext::with_background`].
    pub fn new<M>(
        width: u32,
        height: u32,
        mut main_factory: M,
        offscreen_factory: impl SurfaceFactory<C> + 'static,
    ) -> Result<Self>
    where
        M: SurfaceFactory<C>,
    {
        let size = validate_dimensions(width, height)?;
        let main = RenderSurface::create(&mut main_factory, size, BLACK)?;
        Ok(Self {
            size,
            main,
            buffers: BTreeMap::new(),
            offscreen_factory: Box::new(offscreen_factory),
            layers: LayerState::new(),
        })
    }

    /// Set the main surface clear color.
    ///
    /// [`Gauge::render`](crate::Gauge::render) replaces it with the gauge
    /// palette's `background` on every frame.
    #[must_use]
    pub fn with_background(
        mut self,
        color: Rgb565,
    ) -> Self {
        self.main.set_clear_color(color);
        self
    }

    #[inline]
    pub const fn size(&self) -> Size { self.size }

    #[inline]
    pub fn main(&self) -> &RenderSurface<C> { &self.main }

    #[inline]
    pub fn main_mut(&mut self) -> &mut RenderSurface<C> { &mut self.main }

    #[inline]
    pub const fn layers(&self) -> &LayerState { &self.layers }

    #[inline]
    pub fn layers_mut(&mut self) -> &mut LayerState { &mut self.layers }

    pub fn buffer_count(&self) -> usize { self.buffers.len() }

    /// Existing buffer for `key`, without creating one.
    pub fn buffer(
        &self,
        key: &str,
    ) -> Option<&RenderSurface<C>> {
        self.buffers.get(key)
    }

    /// The buffer for `key`, created on first use.
    ///
    /// Fails with [`GaugeError::BufferKeyInvalid`] for an empty key and with
    /// [`GaugeError::SurfaceUnavailable`] when the buffer cannot be created.
    pub fn get_buffer_surface(
        &mut self,
        key: &str,
    ) -> Result<&mut RenderSurface<C>> {
        if key.is_empty() {
            return Err(GaugeError::BufferKeyInvalid { key: key.to_owned() });
        }
        if !self.buffers.contains_key(key) {
            let mut surface = RenderSurface::create(self.offscreen_factory.as_mut(), self.size, TRANSPARENT_KEY)?;
            surface.clear();
            log::debug!("buffer `{key}` created");
            self.buffers.insert(key.to_owned(), surface);
        }
        self.buffers.get_mut(key).ok_or_else(|| GaugeError::BufferKeyInvalid { key: key.to_owned() })
    }

    /// Resize every owned surface, clearing each exactly once.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let size = validate_dimensions(width, height)?;
        self.size = size;
        self.main.resize(size);
        for buffer in self.buffers.values_mut() {
            buffer.resize(size);
        }
        self.layers.invalidate();
        log::debug!("render context resized to {width}x{height} ({} buffers)", self.buffers.len());
        Ok(())
    }

    /// Clear every owned surface without resizing.
    pub fn clear_all(&mut self) {
        self.main.clear();
        for buffer in self.buffers.values_mut() {
            buffer.clear();
        }
        self.layers.invalidate();
    }

    /// Drop every buffer. The main surface stays.
    pub fn destroy(&mut self) {
        log::debug!("render context destroyed ({} buffers released)", self.buffers.len());
        self.buffers.clear();
        self.layers.invalidate();
    }

    /// Composite buffer `key` onto the main surface, skipping transparent pixels.
    pub fn blit_buffer(
        &mut self,
        key: &str,
    ) -> Result<()> {
        let Self { main, buffers, .. } = self;
        let buffer = buffers.get(key).ok_or_else(|| GaugeError::BufferKeyInvalid { key: key.to_owned() })?;
        blit(buffer.canvas(), main.canvas_mut(), Point::zero(), TRANSPARENT_KEY);
        Ok(())
    }
}

/// Free-function form of [`RenderContext::new`].
pub fn create_render_context<C, M>(
    width: u32,
    height: u32,
    main_factory: M,
    offscreen_factory: impl SurfaceFactory<C> + 'static,
) -> Result<RenderContext<C>>
where
    C: Canvas,
    M: SurfaceFactory<C>,
{
    RenderContext::new(width, height, main_factory, offscreen_factory)
}

// =============================================================================
// Unit Tests
// =============================================================================
