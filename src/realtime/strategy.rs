use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{ScopeError, ScopeResult};
use crate::plot::Figure;
use crate::render::{FrameStyle, RenderBackend, Renderer, project_figure};

/// Host callback asking the UI thread to repaint.
#[derive(Clone)]
pub struct RedrawHook(Arc<dyn Fn() + Send + Sync>);

impl RedrawHook {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(hook))
    }

    pub fn notify(&self) {
        (self.0)();
    }
}

impl fmt::Debug for RedrawHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RedrawHook(..)")
    }
}

/// How a redraw reaches the screen for a given backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// Render the frame inline on the calling thread.
    Draw,
    /// Render, then ask the host to repaint from its own thread.
    DrawAndNotify,
}

impl UpdateStrategy {
    pub fn for_backend(backend: &RenderBackend) -> ScopeResult<Self> {
        match backend {
            RenderBackend::Headless | RenderBackend::Cairo => Ok(Self::Draw),
            RenderBackend::Hosted => Ok(Self::DrawAndNotify),
            RenderBackend::Unknown(name) => Err(ScopeError::UnknownBackend(name.clone())),
        }
    }

    /// Projects `figure` and hands the frame to `renderer`.
    pub fn apply<R: Renderer + ?Sized>(
        self,
        figure: &mut Figure,
        renderer: &mut R,
        style: &FrameStyle,
    ) -> ScopeResult<()> {
        let frame = project_figure(figure, style)?;
        renderer.render(&frame)?;
        figure.mark_redrawn();
        Ok(())
    }

    /// Asks the host to repaint when this strategy requires it.
    ///
    /// Must run after the surface lock is released so the hook may read
    /// the figure.
    pub fn notify(self, hook: Option<&RedrawHook>) {
        if self != Self::DrawAndNotify {
            return;
        }
        match hook {
            Some(hook) => hook.notify(),
            None => trace!("no redraw hook registered"),
        }
    }
}
