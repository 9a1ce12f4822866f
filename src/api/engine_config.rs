use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{AutoscaleTuning, Viewport};
use crate::error::{ScopeError, ScopeResult};
use crate::source::{ReaderKind, SourceOptions};

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Construction options of a plot session.
///
/// Serializable so hosts can persist and reload a scope setup without
/// inventing their own format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Path or identifier handed to the data-source factory.
    pub source: String,
    pub reader: ReaderKind,
    pub source_options: SourceOptions,
    /// Start the background sampling loop on construction.
    pub interactive: bool,
    pub show_toolbar: bool,
    pub tick_interval_ms: u64,
    pub viewport: Viewport,
    pub autoscale: AutoscaleTuning,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            reader: ReaderKind::default(),
            source_options: SourceOptions::new(),
            interactive: true,
            show_toolbar: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            viewport: Viewport::default(),
            autoscale: AutoscaleTuning::default(),
        }
    }
}

impl ScopeConfig {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_reader(mut self, reader: ReaderKind) -> Self {
        self.reader = reader;
        self
    }

    #[must_use]
    pub fn with_source_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.source_options.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[must_use]
    pub fn with_show_toolbar(mut self, show_toolbar: bool) -> Self {
        self.show_toolbar = show_toolbar;
        self
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_autoscale_tuning(mut self, tuning: AutoscaleTuning) -> Self {
        self.autoscale = tuning;
        self
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> ScopeResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(ScopeError::Configuration(
                "tick interval must be > 0 ms".to_owned(),
            ));
        }
        if !self.viewport.is_valid() {
            return Err(ScopeError::Configuration(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        self.autoscale.validate()?;
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ScopeResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ScopeError::Configuration(format!("failed to parse scope config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ScopeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ScopeError::InvalidData(format!("failed to serialize scope config: {e}"))
        })
    }
}
