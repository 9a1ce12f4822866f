use crate::core::Viewport;
use crate::error::ScopeResult;

use super::AxesGrid;

/// Rendering surface state: the current axes grid plus display settings.
///
/// A figure without a grid is blank; `clear` returns it to that state.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    grid: Option<AxesGrid>,
    viewport: Viewport,
    show_toolbar: bool,
    redraw_count: u64,
}

impl Figure {
    pub fn new(viewport: Viewport, show_toolbar: bool) -> ScopeResult<Self> {
        Ok(Self {
            grid: None,
            viewport: viewport.validate()?,
            show_toolbar,
            redraw_count: 0,
        })
    }

    #[must_use]
    pub fn grid(&self) -> Option<&AxesGrid> {
        self.grid.as_ref()
    }

    pub fn grid_mut(&mut self) -> Option<&mut AxesGrid> {
        self.grid.as_mut()
    }

    /// Replaces the grid wholesale and returns the previous one.
    pub fn install_grid(&mut self, grid: AxesGrid) -> Option<AxesGrid> {
        self.grid.replace(grid)
    }

    pub fn clear(&mut self) -> Option<AxesGrid> {
        self.grid.take()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ScopeResult<()> {
        self.viewport = viewport.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn show_toolbar(&self) -> bool {
        self.show_toolbar
    }

    #[must_use]
    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    pub(crate) fn mark_redrawn(&mut self) {
        self.redraw_count += 1;
    }
}
