use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::plot::PlotSpec;

/// Whether the engine has an active line set to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    #[default]
    None,
    Plot,
}

/// Immutable configuration of the active plot, read once per tick.
///
/// Updates build a new session and swap it in whole; a tick holding the
/// previous one keeps seeing consistent values.
#[derive(Debug, Clone)]
pub struct PlotSession {
    spec: Arc<PlotSpec>,
    window_size: Option<usize>,
    autoscale_x: bool,
    autoscale_y: bool,
    generation: u64,
}

impl PlotSession {
    #[must_use]
    pub fn new(spec: PlotSpec, generation: u64) -> Self {
        Self {
            window_size: spec.window_size,
            autoscale_x: spec.autoscale_x,
            autoscale_y: spec.autoscale_y,
            spec: Arc::new(spec),
            generation,
        }
    }

    #[must_use]
    pub fn spec(&self) -> &PlotSpec {
        &self.spec
    }

    #[must_use]
    pub fn window_size(&self) -> Option<usize> {
        self.window_size
    }

    #[must_use]
    pub fn autoscale_x(&self) -> bool {
        self.autoscale_x
    }

    #[must_use]
    pub fn autoscale_y(&self) -> bool {
        self.autoscale_y
    }

    /// Number of the `plot` call that created this session.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn one_d(&self) -> bool {
        self.spec.one_d
    }

    #[must_use]
    pub fn with_window_size(&self, window_size: Option<usize>) -> Self {
        Self {
            window_size,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_autoscale(&self, x: bool, y: bool) -> Self {
        Self {
            autoscale_x: x,
            autoscale_y: y,
            ..self.clone()
        }
    }
}
