#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{LinearScale, PixelRect, Viewport};
use crate::error::ScopeResult;
use crate::plot::{AxesCell, AxesGrid, Figure, LineHandle};
use crate::render::frame::CellPrimitives;
use crate::render::ticks::{format_tick, nice_ticks};
use crate::render::{
    Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, palette_color,
};

pub const TOOLBAR_HEIGHT_PX: f64 = 28.0;

/// Visual constants used when projecting a figure into a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub axes_fill: Color,
    pub axes_border: Color,
    pub toolbar_fill: Color,
    pub text_color: Color,
    pub font_size_px: f64,
    pub line_width: f64,
    pub tick_length_px: f64,
    pub max_ticks: usize,
    pub gutter_left_px: f64,
    pub gutter_right_px: f64,
    pub gutter_top_px: f64,
    pub gutter_bottom_px: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            axes_fill: Color::WHITE,
            axes_border: Color::rgb(0.15, 0.15, 0.15),
            toolbar_fill: Color::rgb(0.92, 0.92, 0.92),
            text_color: Color::rgb(0.1, 0.1, 0.1),
            font_size_px: 10.0,
            line_width: 1.5,
            tick_length_px: 4.0,
            max_ticks: 5,
            gutter_left_px: 52.0,
            gutter_right_px: 12.0,
            gutter_top_px: 10.0,
            gutter_bottom_px: 28.0,
        }
    }
}

/// Axes rectangle of every grid cell, row-major.
#[must_use]
pub fn cell_rects(
    viewport: Viewport,
    rows: usize,
    cols: usize,
    show_toolbar: bool,
    style: &FrameStyle,
) -> Vec<PixelRect> {
    let top_band = if show_toolbar { TOOLBAR_HEIGHT_PX } else { 0.0 };
    let width = f64::from(viewport.width);
    let height = (f64::from(viewport.height) - top_band).max(1.0);
    let cell_width = width / cols.max(1) as f64;
    let cell_height = height / rows.max(1) as f64;

    (0..rows * cols)
        .map(|index| {
            let row = (index / cols) as f64;
            let col = (index % cols) as f64;
            let left = col * cell_width + style.gutter_left_px;
            let top = top_band + row * cell_height + style.gutter_top_px;
            PixelRect::new(
                left,
                top,
                (cell_width - style.gutter_left_px - style.gutter_right_px).max(1.0),
                (cell_height - style.gutter_top_px - style.gutter_bottom_px).max(1.0),
            )
        })
        .collect()
}

/// Projects the current figure into a backend-agnostic frame.
///
/// A figure without a grid yields a frame with only the toolbar band.
pub fn project_figure(figure: &Figure, style: &FrameStyle) -> ScopeResult<RenderFrame> {
    let viewport = figure.viewport();
    let mut frame = RenderFrame::new(viewport);

    if figure.show_toolbar() {
        frame.rects.push(RectPrimitive::new(
            0.0,
            0.0,
            f64::from(viewport.width),
            TOOLBAR_HEIGHT_PX.min(f64::from(viewport.height)),
            style.toolbar_fill,
        ));
    }

    let Some(grid) = figure.grid() else {
        return Ok(frame);
    };

    let (rows, cols) = grid.shape();
    let rects = cell_rects(viewport, rows, cols, figure.show_toolbar(), style);

    #[cfg(feature = "parallel-projection")]
    let projected: Vec<ScopeResult<CellPrimitives>> = grid
        .cells()
        .par_iter()
        .enumerate()
        .map(|(index, cell)| project_cell(grid, index, cell, rects[index], style))
        .collect();

    #[cfg(not(feature = "parallel-projection"))]
    let projected: Vec<ScopeResult<CellPrimitives>> = grid
        .cells()
        .iter()
        .enumerate()
        .map(|(index, cell)| project_cell(grid, index, cell, rects[index], style))
        .collect();

    for cell in projected {
        frame.append_cell(cell?);
    }
    Ok(frame)
}

fn project_cell(
    grid: &AxesGrid,
    index: usize,
    cell: &AxesCell,
    rect: PixelRect,
    style: &FrameStyle,
) -> ScopeResult<CellPrimitives> {
    let x_limits = grid.x_limits(index);
    let y_limits = grid.y_limits(index);
    let x_scale = LinearScale::from_range(x_limits, rect.left, rect.right())?;
    let y_scale = LinearScale::from_range(y_limits, rect.bottom(), rect.top)?;

    let mut out = CellPrimitives::default();
    out.rects.push(
        RectPrimitive::new(rect.left, rect.top, rect.width, rect.height, style.axes_fill)
            .with_border(1.0, style.axes_border),
    );

    for line in cell.lines() {
        append_line_segments(&mut out.lines, line, x_scale, y_scale, rect, style)?;
    }

    for value in nice_ticks(x_limits, style.max_ticks) {
        let x = x_scale.domain_to_pixel(value)?;
        out.lines.push(LinePrimitive::new(
            x,
            rect.bottom(),
            x,
            rect.bottom() + style.tick_length_px,
            1.0,
            style.axes_border,
        ));
        if cell.x_tick_labels_visible() {
            out.texts.push(TextPrimitive::new(
                format_tick(value),
                x,
                rect.bottom() + style.tick_length_px + 2.0,
                style.font_size_px,
                style.text_color,
                TextHAlign::Center,
            ));
        }
    }

    for value in nice_ticks(y_limits, style.max_ticks) {
        let y = y_scale.domain_to_pixel(value)?;
        out.lines.push(LinePrimitive::new(
            rect.left - style.tick_length_px,
            y,
            rect.left,
            y,
            1.0,
            style.axes_border,
        ));
        if cell.y_tick_labels_visible() {
            out.texts.push(TextPrimitive::new(
                format_tick(value),
                rect.left - style.tick_length_px - 2.0,
                y - style.font_size_px * 0.6,
                style.font_size_px,
                style.text_color,
                TextHAlign::Right,
            ));
        }
    }

    if cell.legend().is_some() && !cell.lines().is_empty() {
        append_legend(&mut out, cell, rect, style);
    }

    Ok(out)
}

fn line_color(line: &LineHandle) -> Color {
    line.options()
        .color
        .unwrap_or_else(|| palette_color(line.id().0 as usize))
}

/// Consecutive finite points become one segment each, clipped to the axes
/// rect. A sample that is non-finite, or projects outside the representable
/// pixel range, breaks the polyline.
fn append_line_segments(
    out: &mut Vec<LinePrimitive>,
    line: &LineHandle,
    x_scale: LinearScale,
    y_scale: LinearScale,
    rect: PixelRect,
    style: &FrameStyle,
) -> ScopeResult<()> {
    let color = line_color(line);
    let width = line.options().stroke_width.unwrap_or(style.line_width);
    let mut previous: Option<(f64, f64)> = None;

    for (&x, &y) in line.x().iter().zip(line.y()) {
        if !x.is_finite() || !y.is_finite() {
            previous = None;
            continue;
        }
        let point = (x_scale.domain_to_pixel(x)?, y_scale.domain_to_pixel(y)?);
        if !point.0.is_finite() || !point.1.is_finite() {
            previous = None;
            continue;
        }
        if let Some(start) = previous {
            if let Some(((x1, y1), (x2, y2))) = clip_segment(rect, start, point) {
                out.push(LinePrimitive::new(x1, y1, x2, y2, width, color));
            }
        }
        previous = Some(point);
    }
    Ok(())
}

/// Liang-Barsky clip of the segment `a`-`b` against `rect`.
///
/// Returns `None` when no part of the segment lies inside. Endpoints already
/// inside are returned unchanged.
fn clip_segment(
    rect: PixelRect,
    a: (f64, f64),
    b: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }

    let mut enter = 0.0_f64;
    let mut exit = 1.0_f64;
    let edges = [
        (-dx, a.0 - rect.left),
        (dx, rect.right() - a.0),
        (-dy, a.1 - rect.top),
        (dy, rect.bottom() - a.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: inside or entirely out.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > exit {
                return None;
            }
            enter = enter.max(t);
        } else if t < enter {
            return None;
        } else {
            exit = exit.min(t);
        }
    }

    let at = |t: f64| (a.0 + t * dx, a.1 + t * dy);
    let start = if enter > 0.0 { at(enter) } else { a };
    let end = if exit < 1.0 { at(exit) } else { b };
    Some((start, end))
}

fn append_legend(out: &mut CellPrimitives, cell: &AxesCell, rect: PixelRect, style: &FrameStyle) {
    let Some(location) = cell.legend() else {
        return;
    };
    let row_height = style.font_size_px + 4.0;
    let swatch = 18.0;
    let padding = 6.0;
    let widest = cell
        .lines()
        .iter()
        .map(|line| line.label().chars().count())
        .max()
        .unwrap_or(0) as f64;
    let width = (widest * style.font_size_px * 0.6 + swatch + padding * 3.0).min(rect.width);
    let height = (cell.lines().len() as f64 * row_height + padding * 2.0).min(rect.height);

    let (ax, ay) = location.anchor();
    let left = rect.left + padding + ax * (rect.width - width - padding * 2.0).max(0.0);
    let top = rect.top + padding + ay * (rect.height - height - padding * 2.0).max(0.0);

    out.rects.push(
        RectPrimitive::new(left, top, width, height, Color::rgba(1.0, 1.0, 1.0, 0.8))
            .with_border(1.0, style.axes_border),
    );

    for (row, line) in cell.lines().iter().enumerate() {
        let y = top + padding + row as f64 * row_height;
        let mid = y + row_height * 0.5;
        out.lines.push(LinePrimitive::new(
            left + padding,
            mid,
            left + padding + swatch,
            mid,
            style.line_width,
            line_color(line),
        ));
        if !line.label().is_empty() {
            out.texts.push(TextPrimitive::new(
                line.label(),
                left + padding * 2.0 + swatch,
                y,
                style.font_size_px,
                style.text_color,
                TextHAlign::Left,
            ));
        }
    }
}
