use crate::error::ScopeResult;
use crate::realtime::RealtimeEngine;
use crate::render::Renderer;
use crate::source::{BoxedDataSource, SourceOptions, open_source};

use super::ScopeConfig;

/// Opens an engine on `config.source` with the built-in reader selected by
/// `config.reader`.
pub fn open_engine<R: Renderer + 'static>(
    config: &ScopeConfig,
    renderer: R,
) -> ScopeResult<RealtimeEngine<R>> {
    let source = open_source(config.reader, &config.source, &config.source_options)?;
    RealtimeEngine::new(config, source, renderer)
}

/// Opens an engine with a caller-supplied data-source factory.
///
/// The factory receives the source identifier and the free-form options
/// exactly as configured.
pub fn open_engine_with<R, F>(
    config: &ScopeConfig,
    factory: F,
    renderer: R,
) -> ScopeResult<RealtimeEngine<R>>
where
    R: Renderer + 'static,
    F: FnOnce(&str, &SourceOptions) -> ScopeResult<BoxedDataSource>,
{
    let source = factory(&config.source, &config.source_options)?;
    RealtimeEngine::new(config, source, renderer)
}
