//! Pluggable gauge extensions (overlays, markers, custom needles).
//!
//! Extensions are registered under unique ids and tagged with the pipeline
//! point they hook into:
//!
//! | Point     | Runs during  | Typical use                         |
//! |-----------|--------------|-------------------------------------|
//! | `Overlay` | content      | zones, glare, extra arcs            |
//! | `Marker`  | content      | target/bug markers on the scale     |
//! | `Needle`  | foreground   | additional or replacement pointers  |
//!
//! The registry itself never draws. Gauges call
//! [`ExtensionRegistry::render_point`] from the matching stage, which hands
//! every extension an [`ExtensionContext`].

use crate::error::{GaugeError, Result};
use crate::gauges::GaugeKind;
use crate::surface::RenderSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionPoint {
    Overlay,
    Marker,
    Needle,
}

/// Everything an extension may look at while drawing.
pub struct ExtensionContext<'a, T, C> {
    pub kind: GaugeKind,
    pub config: &'a T,
    /// Displayed value (or heading) this frame.
    pub value: f64,
    pub surface: &'a mut RenderSurface<C>,
}

/// Extension draw function.
pub type ExtensionRenderFn<T, C> = Box<dyn Fn(&mut ExtensionContext<'_, T, C>) -> Result<()>>;

/// An extension, tagged by its hook point.
pub enum GaugeExtension<T, C> {
    Overlay(ExtensionRenderFn<T, C>),
    Marker(ExtensionRenderFn<T, C>),
    Needle(ExtensionRenderFn<T, C>),
}

impl<T, C> GaugeExtension<T, C> {
    pub fn overlay(render: impl Fn(&mut ExtensionContext<'_, T, C>) -> Result<()> + 'static) -> Self {
        Self::Overlay(Box::new(render))
    }

    pub fn marker(render: impl Fn(&mut ExtensionContext<'_, T, C>) -> Result<()> + 'static) -> Self {
        Self::Marker(Box::new(render))
    }

    pub fn needle(render: impl Fn(&mut ExtensionContext<'_, T, C>) -> Result<()> + 'static) -> Self {
        Self::Needle(Box::new(render))
    }

    pub const fn point(&self) -> ExtensionPoint {
        match self {
            Self::Overlay(_) => ExtensionPoint::Overlay,
            Self::Marker(_) => ExtensionPoint::Marker,
            Self::Needle(_) => ExtensionPoint::Needle,
        }
    }

    pub fn render(
        &self,
        ctx: &mut ExtensionContext<'_, T, C>,
    ) -> Result<()> {
        match self {
            Self::Overlay(render) | Self::Marker(render) | Self::Needle(render) => render(ctx),
        }
    }
}

impl<T, C> core::fmt::Debug for GaugeExtension<T, C> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        write!(f, "GaugeExtension::{:?}", self.point())
    }
}

/// Id-keyed extension store, kept in registration order.
pub struct ExtensionRegistry<T, C> {
    entries: Vec<(String, GaugeExtension<T, C>)>,
}

impl<T, C> Default for ExtensionRegistry<T, C> {
    fn default() -> Self { Self { entries: Vec::new() } }
}

impl<T, C> ExtensionRegistry<T, C> {
    pub fn new() -> Self { Self::default() }

    /// Add an extension under a unique, non-empty id.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        extension: GaugeExtension<T, C>,
    ) -> Result<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(GaugeError::EmptyExtensionId);
        }
        if self.get(&id).is_some() {
            return Err(GaugeError::DuplicateExtensionId { id });
        }
        log::debug!("extension `{id}` registered at {:?}", extension.point());
        self.entries.push((id, extension));
        Ok(())
    }

    /// Remove and return the extension registered under `id`.
    pub fn unregister(
        &mut self,
        id: &str,
    ) -> Option<GaugeExtension<T, C>> {
        let index = self.entries.iter().position(|(k, _)| k == id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&GaugeExtension<T, C>> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, e)| e)
    }

    /// Registered extensions, optionally filtered to one point.
    pub fn list(
        &self,
        point: Option<ExtensionPoint>,
    ) -> Vec<(&str, &GaugeExtension<T, C>)> {
        self.entries
            .iter()
            .filter(|(_, e)| point.is_none_or(|p| e.point() == p))
            .map(|(k, e)| (k.as_str(), e))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Render every extension at `point` onto `surface`, stopping at the first
    /// error.
    pub fn render_point(
        &self,
        point: ExtensionPoint,
        kind: GaugeKind,
        config: &T,
        value: f64,
        surface: &mut RenderSurface<C>,
    ) -> Result<()> {
        let mut ctx = ExtensionContext { kind, config, value, surface };
        for (_, extension) in self.entries.iter().filter(|(_, e)| e.point() == point) {
            extension.render(&mut ctx)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
