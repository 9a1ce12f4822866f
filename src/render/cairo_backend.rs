use std::fs::File;
use std::path::Path;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::debug;

use crate::core::Viewport;
use crate::error::{ScopeError, ScopeResult};
use crate::render::{Color, RectPrimitive, RenderBackend, RenderFrame, Renderer, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo raster backend.
///
/// Cairo surfaces are tied to one thread, so each render creates its own
/// image surface and copies the result into an owned ARGB32 buffer. Hosts
/// with a native Cairo context paint frames directly with [`paint_frame`].
#[derive(Debug)]
pub struct CairoRenderer {
    viewport: Viewport,
    stride: i32,
    pixels: Vec<u8>,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(viewport: Viewport) -> ScopeResult<Self> {
        surface_size(viewport)?;
        Ok(Self {
            viewport,
            stride: 0,
            pixels: Vec::new(),
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// ARGB32 pixels of the last render, empty before the first one.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn stride(&self) -> i32 {
        self.stride
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ScopeResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Writes the last rendered image as PNG.
    pub fn write_png(&self, path: impl AsRef<Path>) -> ScopeResult<()> {
        if self.pixels.is_empty() {
            return Err(ScopeError::InvalidData(
                "nothing has been rendered yet".to_owned(),
            ));
        }
        let (width, height) = surface_size(self.viewport)?;
        let surface = ImageSurface::create_for_data(
            self.pixels.clone(),
            Format::ARgb32,
            width,
            height,
            self.stride,
        )
        .map_err(|err| map_backend_error("failed to wrap pixel buffer", err))?;
        let mut file = File::create(path.as_ref())?;
        surface
            .write_to_png(&mut file)
            .map_err(|err| ScopeError::InvalidData(format!("failed to write png: {err}")))?;
        debug!(path = %path.as_ref().display(), "wrote png");
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn backend(&self) -> RenderBackend {
        RenderBackend::Cairo
    }

    fn render(&mut self, frame: &RenderFrame) -> ScopeResult<()> {
        let (width, height) = surface_size(frame.viewport)?;
        let mut surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        {
            let context = Context::new(&surface)
                .map_err(|err| map_backend_error("failed to create cairo context", err))?;
            self.last_stats = paint_frame(&context, frame, self.clear_color)?;
        }
        surface.flush();

        self.viewport = frame.viewport;
        self.stride = surface.stride();
        let data = surface
            .data()
            .map_err(|err| ScopeError::InvalidData(format!("failed to read surface: {err}")))?;
        self.pixels.clear();
        self.pixels.extend_from_slice(&data);
        Ok(())
    }

    fn release(&mut self) -> ScopeResult<()> {
        self.pixels = Vec::new();
        Ok(())
    }
}

/// Paints `frame` onto an existing Cairo context, e.g. inside a host
/// widget's draw callback.
pub fn paint_frame(
    context: &Context,
    frame: &RenderFrame,
    clear_color: Color,
) -> ScopeResult<CairoRenderStats> {
    frame.validate()?;
    clear_color.validate()?;

    apply_color(context, clear_color);
    context
        .paint()
        .map_err(|err| map_backend_error("failed to clear surface", err))?;

    let mut stats = CairoRenderStats::default();

    for rect in &frame.rects {
        fill_rect(context, *rect)?;
        stats.rects_drawn += 1;
    }

    for line in &frame.lines {
        apply_color(context, line.color);
        context.set_line_width(line.stroke_width);
        context.move_to(line.x1, line.y1);
        context.line_to(line.x2, line.y2);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke line", err))?;
        stats.lines_drawn += 1;
    }

    for text in &frame.texts {
        let layout = pangocairo::functions::create_layout(context);
        let font_description = FontDescription::from_string(&format!("Sans {}", text.font_size_px));
        layout.set_font_description(Some(&font_description));
        layout.set_text(&text.text);

        let (text_width, _text_height) = layout.pixel_size();
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };

        apply_color(context, text.color);
        context.move_to(x, text.y);
        pangocairo::functions::show_layout(context, &layout);
        stats.texts_drawn += 1;
    }

    Ok(stats)
}

fn fill_rect(context: &Context, rect: RectPrimitive) -> ScopeResult<()> {
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
    apply_color(context, rect.fill_color);
    match rect.border {
        Some((border_width, border_color)) => {
            context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            apply_color(context, border_color);
            context.set_line_width(border_width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke rectangle border", err))
        }
        None => context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err)),
    }
}

fn surface_size(viewport: Viewport) -> ScopeResult<(i32, i32)> {
    let viewport = viewport.validate()?;
    let invalid = || ScopeError::InvalidViewport {
        width: viewport.width,
        height: viewport.height,
    };
    let width = i32::try_from(viewport.width).map_err(|_| invalid())?;
    let height = i32::try_from(viewport.height).map_err(|_| invalid())?;
    Ok((width, height))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ScopeError {
    ScopeError::InvalidData(format!("{prefix}: {err}"))
}
