mod figure_frame;
mod frame;
mod hosted;
mod null_renderer;
mod primitives;
pub mod ticks;

use std::fmt;
use std::str::FromStr;

pub use figure_frame::{FrameStyle, TOOLBAR_HEIGHT_PX, cell_rects, project_figure};
pub use frame::RenderFrame;
pub use hosted::{FrameSlot, HostedRenderer};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LINE_PALETTE, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive, palette_color,
};

use crate::error::{ScopeError, ScopeResult};

/// Rendering backend a renderer draws through.
///
/// `Unknown` keeps the requested name so the strategy lookup can reject it
/// with a precise error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RenderBackend {
    Headless,
    Cairo,
    Hosted,
    Unknown(String),
}

impl RenderBackend {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Headless => "headless",
            Self::Cairo => "cairo",
            Self::Hosted => "hosted",
            Self::Unknown(name) => name,
        }
    }
}

impl From<&str> for RenderBackend {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "headless" | "null" | "agg" => Self::Headless,
            "cairo" => Self::Cairo,
            "hosted" | "gtk" | "wxagg" => Self::Hosted,
            _ => Self::Unknown(value.to_owned()),
        }
    }
}

impl FromStr for RenderBackend {
    type Err = ScopeError;

    fn from_str(value: &str) -> ScopeResult<Self> {
        Ok(Self::from(value))
    }
}

impl fmt::Display for RenderBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame`, so drawing code
/// stays isolated from plot layout and the sampling loop. Renderers move
/// onto the sampling thread and must be `Send`.
pub trait Renderer: Send {
    fn backend(&self) -> RenderBackend;

    fn render(&mut self, frame: &RenderFrame) -> ScopeResult<()>;

    /// Releases backend resources. Called once when the engine closes.
    fn release(&mut self) -> ScopeResult<()> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn backend(&self) -> RenderBackend {
        (**self).backend()
    }

    fn render(&mut self, frame: &RenderFrame) -> ScopeResult<()> {
        (**self).render(frame)
    }

    fn release(&mut self) -> ScopeResult<()> {
        (**self).release()
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer, paint_frame};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!(RenderBackend::from("Agg"), RenderBackend::Headless);
        assert_eq!(RenderBackend::from("WXAgg"), RenderBackend::Hosted);
        assert_eq!(RenderBackend::from("cairo"), RenderBackend::Cairo);
        assert_eq!(
            RenderBackend::from("qt5"),
            RenderBackend::Unknown("qt5".to_owned())
        );
    }
}
