//! Realtime refresh of a plotted figure.
//!
//! Each tick pulls the full table from the data source, recomputes every
//! line from the active [`PlotSession`], applies the autoscale policy and
//! redraws through the backend's [`UpdateStrategy`].

mod autoscale;
mod engine;
mod sampler;
mod session;
mod snapshot;
mod strategy;

pub use autoscale::autoscale_axes;
pub use engine::{EngineState, RealtimeEngine, TickErrorHook};
pub use session::{EngineMode, PlotSession};
pub use snapshot::{CellSnapshot, EngineSnapshot, LineSnapshot};
pub use strategy::{RedrawHook, UpdateStrategy};
