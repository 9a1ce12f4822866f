use crate::error::ScopeResult;
use crate::render::{RenderBackend, RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests catch invalid geometry without
/// a real backend. `backend` can be overridden to exercise strategy lookup.
#[derive(Debug)]
pub struct NullRenderer {
    pub backend: RenderBackend,
    pub last_line_count: usize,
    pub last_text_count: usize,
    pub render_count: u64,
    pub released: bool,
}

impl Default for NullRenderer {
    fn default() -> Self {
        Self::with_backend(RenderBackend::Headless)
    }
}

impl NullRenderer {
    #[must_use]
    pub fn with_backend(backend: RenderBackend) -> Self {
        Self {
            backend,
            last_line_count: 0,
            last_text_count: 0,
            render_count: 0,
            released: false,
        }
    }
}

impl Renderer for NullRenderer {
    fn backend(&self) -> RenderBackend {
        self.backend.clone()
    }

    fn render(&mut self, frame: &RenderFrame) -> ScopeResult<()> {
        frame.validate()?;
        self.last_line_count = frame.lines.len();
        self.last_text_count = frame.texts.len();
        self.render_count += 1;
        Ok(())
    }

    fn release(&mut self) -> ScopeResult<()> {
        self.released = true;
        Ok(())
    }
}
