//! Fixed-order render pipeline.
//!
//! Every gauge draws in four stages:
//!
//! ```text
//! frame -> background -> content -> foreground
//! ```
//!
//! Content can never paint over the frame and the foreground (needles,
//! pointers) always paints last. Stages are optional; missing ones are skipped.
//! The first stage that fails aborts the run and its error is returned.

use crate::error::Result;
use crate::render::RenderContext;
use crate::surface::Canvas;

/// Pipeline stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStage {
    Frame,
    Background,
    Content,
    Foreground,
}

impl RenderStage {
    pub const ORDER: [Self; 4] = [Self::Frame, Self::Background, Self::Content, Self::Foreground];
}

/// One stage's draw function.
pub type StageFn<'a, C> = Box<dyn FnOnce(&mut RenderContext<C>) -> Result<()> + 'a>;

/// Stage functions for one pipeline run.
pub struct RenderStages<'a, C> {
    frame: Option<StageFn<'a, C>>,
    background: Option<StageFn<'a, C>>,
    content: Option<StageFn<'a, C>>,
    foreground: Option<StageFn<'a, C>>,
}

impl<C> Default for RenderStages<'_, C> {
    fn default() -> Self { Self { frame: None, background: None, content: None, foreground: None } }
}

impl<'a, C> RenderStages<'a, C> {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn frame(
        mut self,
        stage: impl FnOnce(&mut RenderContext<C>) -> Result<()> + 'a,
    ) -> Self {
        self.frame = Some(Box::new(stage));
        self
    }

    #[must_use]
    pub fn background(
        mut self,
        stage: impl FnOnce(&mut RenderContext<C>) -> Result<()> + 'a,
    ) -> Self {
        self.background = Some(Box::new(stage));
        self
    }

    #[must_use]
    pub fn content(
        mut self,
        stage: impl FnOnce(&mut RenderContext<C>) -> Result<()> + 'a,
    ) -> Self {
        self.content = Some(Box::new(stage));
        self
    }

    #[must_use]
    pub fn foreground(
        mut self,
        stage: impl FnOnce(&mut RenderContext<C>) -> Result<()> + 'a,
    ) -> Self {
        self.foreground = Some(Box::new(stage));
        self
    }

    fn take(
        &mut self,
        stage: RenderStage,
    ) -> Option<StageFn<'a, C>> {
        match stage {
            RenderStage::Frame => self.frame.take(),
            RenderStage::Background => self.background.take(),
            RenderStage::Content => self.content.take(),
            RenderStage::Foreground => self.foreground.take(),
        }
    }
}

/// Run the defined stages once each, in [`RenderStage::ORDER`].
pub fn run_gauge_render_pipeline<C: Canvas>(
    ctx: &mut RenderContext<C>,
    mut stages: RenderStages<'_, C>,
) -> Result<()> {
    for stage in RenderStage::ORDER {
        if let Some(draw) = stages.take(stage) {
            log::trace!("render stage {stage:?}");
            draw(ctx).inspect_err(|e| log::trace!("render stage {stage:?} failed: {e}"))?;
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
