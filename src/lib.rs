//! scope-rs: oscilloscope-style realtime line plots.
//!
//! A [`RealtimeEngine`] samples a [`DataSource`] on a fixed cadence, refreshes
//! the lines laid out by the last `plot` call, rescales axes and redraws
//! through a pluggable [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod plot;
pub mod realtime;
pub mod render;
pub mod source;
pub mod telemetry;

pub use api::{ScopeConfig, open_engine, open_engine_with};
pub use error::{ScopeError, ScopeResult};
pub use plot::{PlotRequest, ShareMode};
pub use realtime::{EngineMode, EngineState, RealtimeEngine};
pub use source::DataSource;
