use crate::core::Viewport;
use crate::error::{ScopeError, ScopeResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Primitives projected for one axes cell, merged into the frame in grid
/// order once every cell is projected.
#[derive(Debug, Default)]
pub(crate) struct CellPrimitives {
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

/// Scene for one figure draw pass, handed to whichever backend is active.
///
/// Rects paint first, then lines, then texts, so axes fills never cover the
/// data of the cell they belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub(crate) fn append_cell(&mut self, cell: CellPrimitives) {
        self.rects.extend(cell.rects);
        self.lines.extend(cell.lines);
        self.texts.extend(cell.texts);
    }

    /// Rejects a frame a backend could not paint: a degenerate viewport or
    /// any primitive with non-finite geometry.
    pub fn validate(&self) -> ScopeResult<()> {
        if !self.viewport.is_valid() {
            return Err(ScopeError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        self.lines.iter().try_for_each(|line| line.validate())?;
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }
}
