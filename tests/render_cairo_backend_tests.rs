#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use scope_rs::core::{Table, Viewport};
use scope_rs::plot::PlotRequest;
use scope_rs::realtime::RealtimeEngine;
use scope_rs::render::{CairoRenderer, Color, FrameStyle, paint_frame, project_figure};
use scope_rs::source::MemorySource;
use scope_rs::{ScopeConfig, ScopeError};
use tempfile::TempDir;

fn engine(viewport: Viewport) -> RealtimeEngine<CairoRenderer> {
    let table = Table::from_columns([
        ("t", vec![0.0, 1.0, 2.0, 3.0]),
        ("v", vec![1.0, 4.0, 2.0, 3.0]),
    ])
    .expect("table");
    let config = ScopeConfig::new("memory")
        .with_interactive(false)
        .with_viewport(viewport);
    let renderer = CairoRenderer::new(viewport).expect("renderer");
    let engine = RealtimeEngine::new(&config, MemorySource::new(table), renderer).expect("engine");
    engine
        .plot(PlotRequest::new().x("t").y("v").legend(true))
        .expect("plot");
    engine
}

#[test]
fn cairo_renderer_rejects_empty_viewport() {
    let err = CairoRenderer::new(Viewport::new(0, 480)).expect_err("invalid width must fail");
    assert!(matches!(err, ScopeError::InvalidViewport { width: 0, .. }));
}

#[test]
fn tick_rasterizes_lines_rects_and_labels() {
    let engine = engine(Viewport::new(640, 360));
    engine.tick().expect("tick");

    let (stats, pixels, stride) = engine
        .with_renderer(|renderer| {
            (
                renderer.last_stats(),
                renderer.pixels().len(),
                renderer.stride(),
            )
        })
        .expect("renderer");
    assert!(stats.lines_drawn >= 3);
    assert!(stats.rects_drawn >= 2);
    assert!(stats.texts_drawn >= 1);
    assert_eq!(pixels, stride as usize * 360);
}

#[test]
fn rendered_frame_can_be_saved_as_png() {
    let engine = engine(Viewport::new(320, 200));
    engine.redraw().expect("redraw");

    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("scope.png");
    engine
        .with_renderer(|renderer| renderer.write_png(&path))
        .expect("renderer")
        .expect("write png");
    let bytes = std::fs::read(&path).expect("read png");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn png_export_before_first_render_fails() {
    let renderer = CairoRenderer::new(Viewport::new(32, 32)).expect("renderer");
    let dir = TempDir::new().expect("tempdir");
    assert!(renderer.write_png(dir.path().join("empty.png")).is_err());
}

#[test]
fn frames_paint_onto_a_host_context() {
    let engine = engine(Viewport::new(400, 240));
    let frame = engine
        .with_figure(|figure| project_figure(figure, &FrameStyle::default()))
        .expect("figure")
        .expect("project");

    let surface = ImageSurface::create(Format::ARgb32, 400, 240).expect("surface");
    let context = Context::new(&surface).expect("context");
    let stats = paint_frame(&context, &frame, Color::WHITE).expect("paint");
    assert_eq!(stats.lines_drawn, frame.lines.len());
    assert_eq!(stats.rects_drawn, frame.rects.len());
    assert_eq!(stats.texts_drawn, frame.texts.len());
}
