//! Drawing surfaces: the canvas capability trait and owned render surfaces.
//!
//! A [`Canvas`] is any `embedded-graphics` draw target over `Rgb565` that can
//! also be resized, read back and asked what it supports. Capabilities are
//! queried exactly once, when a [`RenderSurface`] is created; drawing code then
//! branches on the cached [`Capabilities`] instead of probing per call.
//!
//! # Surface Creation
//!
//! Surfaces come from a [`SurfaceFactory`]. A factory returning `None` means no
//! drawing context can be obtained for that size; this is fatal
//! ([`GaugeError::SurfaceUnavailable`]) and never retried.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::error::{GaugeError, Result};

/// Optional drawing features of a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Smooth color ramps. Without it faces are filled flat.
    pub gradients: bool,
    /// Glyph rendering. Without it readouts and labels are skipped.
    pub text: bool,
}

impl Default for Capabilities {
    fn default() -> Self { Self { gradients: true, text: true } }
}

/// A resizable `Rgb565` draw target.
pub trait Canvas: DrawTarget<Color = Rgb565> + OriginDimensions {
    /// Reallocate to `size`. Contents afterwards are unspecified until cleared.
    fn resize(
        &mut self,
        size: Size,
    );

    /// Read one pixel back, `None` outside the canvas.
    fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb565>;

    fn capabilities(&self) -> Capabilities { Capabilities::default() }
}

/// Creates canvases of a requested size.
pub trait SurfaceFactory<C> {
    fn create(
        &mut self,
        size: Size,
    ) -> Option<C>;
}

impl<C, F> SurfaceFactory<C> for F
where
    F: FnMut(Size) -> Option<C>,
{
    fn create(
        &mut self,
        size: Size,
    ) -> Option<C> {
        self(size)
    }
}

// =============================================================================
// Pixel Canvas
// =============================================================================

/// Headless in-memory canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelCanvas {
    size: Size,
    pixels: Vec<Rgb565>,
    capabilities: Capabilities,
}

impl PixelCanvas {
    pub fn new(size: Size) -> Self {
        Self { size, pixels: vec![Rgb565::BLACK; pixel_count(size)], capabilities: Capabilities::default() }
    }

    #[must_use]
    pub fn with_capabilities(
        mut self,
        capabilities: Capabilities,
    ) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Number of pixels equal to `color`.
    pub fn count_color(
        &self,
        color: Rgb565,
    ) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    #[inline]
    fn index(
        &self,
        point: Point,
    ) -> Option<usize> {
        let (x, y) = (usize::try_from(point.x).ok()?, usize::try_from(point.y).ok()?);
        let (w, h) = (self.size.width as usize, self.size.height as usize);
        (x < w && y < h).then_some(y * w + x)
    }
}

fn pixel_count(size: Size) -> usize { size.width as usize * size.height as usize }

/// Factory producing [`PixelCanvas`]es with default capabilities.
pub fn pixel_canvas_factory() -> impl FnMut(Size) -> Option<PixelCanvas> { |size| Some(PixelCanvas::new(size)) }

impl OriginDimensions for PixelCanvas {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for PixelCanvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> core::result::Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl Canvas for PixelCanvas {
    fn resize(
        &mut self,
        size: Size,
    ) {
        self.size = size;
        self.pixels = vec![Rgb565::BLACK; pixel_count(size)];
    }

    fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb565> {
        self.index(point).map(|i| self.pixels[i])
    }

    fn capabilities(&self) -> Capabilities { self.capabilities }
}

#[cfg(feature = "simulator")]
impl Canvas for embedded_graphics_simulator::SimulatorDisplay<Rgb565> {
    fn resize(
        &mut self,
        size: Size,
    ) {
        *self = Self::new(size);
    }

    fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb565> {
        Rectangle::new(Point::zero(), OriginDimensions::size(self)).contains(point).then(|| self.get_pixel(point))
    }
}

// =============================================================================
// Render Surface
// =============================================================================

/// A canvas plus the facts queried from it once at creation.
#[derive(Debug)]
pub struct RenderSurface<C> {
    canvas: C,
    capabilities: Capabilities,
    clear_color: Rgb565,
}

impl<C: Canvas> RenderSurface<C> {
    /// Build a surface through `factory`.
    ///
    /// Fails with [`GaugeError::SurfaceUnavailable`] when the factory cannot
    /// produce a canvas.
    pub fn create<F>(
        factory: &mut F,
        size: Size,
        clear_color: Rgb565,
    ) -> Result<Self>
    where
        F: SurfaceFactory<C> + ?Sized,
    {
        let canvas = factory.create(size).ok_or_else(|| GaugeError::SurfaceUnavailable {
            reason: format!("no drawing context for {}x{} surface", size.width, size.height),
        })?;
        let capabilities = canvas.capabilities();
        log::debug!("surface created: {}x{} {:?}", size.width, size.height, capabilities);
        Ok(Self { canvas, capabilities, clear_color })
    }

    /// Fill with the clear color.
    pub fn clear(&mut self) { self.canvas.clear(self.clear_color).ok(); }

    pub(crate) fn resize(
        &mut self,
        size: Size,
    ) {
        self.canvas.resize(size);
        self.clear();
    }

    pub(crate) fn set_clear_color(
        &mut self,
        color: Rgb565,
    ) {
        self.clear_color = color;
    }

    #[inline]
    pub fn canvas(&self) -> &C { &self.canvas }

    #[inline]
    pub fn canvas_mut(&mut self) -> &mut C { &mut self.canvas }

    #[inline]
    pub const fn capabilities(&self) -> Capabilities { self.capabilities }

    #[inline]
    pub const fn clear_color(&self) -> Rgb565 { self.clear_color }

    #[inline]
    pub fn size(&self) -> Size { self.canvas.size() }

    /// Canvas bounds as a rectangle at the origin.
    #[inline]
    pub fn bounds(&self) -> Rectangle { Rectangle::new(Point::zero(), self.size()) }
}

// =============================================================================
// Test Support
// =============================================================================


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    use super::*;

    #[test]
    fn test_pixel_canvas_draw_and_read_back() {
        let mut canvas = PixelCanvas::new(Size::new(10, 10));
        Rectangle::new(Point::new(2, 2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut canvas)
            .ok();
        assert_eq!(canvas.pixel(Point::new(3, 3)), Some(Rgb565::RED));
        assert_eq!(canvas.pixel(Point::new(0, 0)), Some(Rgb565::BLACK));
        assert_eq!(canvas.pixel(Point::new(10, 0)), None, "outside the canvas");
        assert_eq!(canvas.count_color(Rgb565::RED), 9);
    }

    #[test]
    fn test_pixel_canvas_ignores_out_of_bounds_pixels() {
        let mut canvas = PixelCanvas::new(Size::new(4, 4));
        canvas.draw_iter([Pixel(Point::new(-1, 0), Rgb565::RED), Pixel(Point::new(4, 4), Rgb565::RED)]).ok();
        assert_eq!(canvas.count_color(Rgb565::RED), 0);
    }

    #[test]
    fn test_surface_queries_capabilities_once() {
        let flat = Capabilities { gradients: false, text: true };
        let mut factory = move |size: Size| Some(PixelCanvas::new(size).with_capabilities(flat));
        let surface = RenderSurface::create(&mut factory, Size::new(8, 8), Rgb565::BLACK).unwrap();
        assert_eq!(surface.capabilities(), flat);
    }

    #[test]
    fn test_surface_unavailable_when_factory_fails() {
        let mut factory = |_size: Size| -> Option<PixelCanvas> { None };
        let err = RenderSurface::create(&mut factory, Size::new(8, 8), Rgb565::BLACK).unwrap_err();
        assert!(matches!(err, GaugeError::SurfaceUnavailable { .. }));
    }

    #[test]
    fn test_surface_resize_clears_to_clear_color() {
        let mut factory = pixel_canvas_factory();
        let mut surface = RenderSurface::create(&mut factory, Size::new(4, 4), Rgb565::BLUE).unwrap();
        surface.resize(Size::new(6, 2));
        assert_eq!(surface.size(), Size::new(6, 2));
        assert_eq!(surface.canvas().count_color(Rgb565::BLUE), 12);
    }
}
