use std::sync::{Arc, Mutex};

use crate::error::{ScopeError, ScopeResult};
use crate::render::{RenderBackend, RenderFrame, Renderer};

/// Latest frame handed from the sampling thread to a host UI thread.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    inner: Arc<Mutex<Option<RenderFrame>>>,
}

impl FrameSlot {
    /// Clone of the most recent frame, if any was rendered.
    pub fn latest(&self) -> ScopeResult<Option<RenderFrame>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| ScopeError::InvalidData("frame slot lock poisoned".to_owned()))?;
        Ok(guard.clone())
    }

    /// Takes the pending frame, leaving the slot empty.
    pub fn take(&self) -> ScopeResult<Option<RenderFrame>> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ScopeError::InvalidData("frame slot lock poisoned".to_owned()))?;
        Ok(guard.take())
    }

    fn store(&self, frame: RenderFrame) -> ScopeResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ScopeError::InvalidData("frame slot lock poisoned".to_owned()))?;
        *guard = Some(frame);
        Ok(())
    }
}

/// Renderer for hosts that own their UI thread.
///
/// Frames are parked in a [`FrameSlot`]; the host paints them from its own
/// draw callback after the engine's redraw hook fires.
#[derive(Debug, Default)]
pub struct HostedRenderer {
    slot: FrameSlot,
}

impl HostedRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn slot(&self) -> FrameSlot {
        self.slot.clone()
    }
}

impl Renderer for HostedRenderer {
    fn backend(&self) -> RenderBackend {
        RenderBackend::Hosted
    }

    fn render(&mut self, frame: &RenderFrame) -> ScopeResult<()> {
        frame.validate()?;
        self.slot.store(frame.clone())
    }

    fn release(&mut self) -> ScopeResult<()> {
        self.slot.take().map(|_| ())
    }
}
