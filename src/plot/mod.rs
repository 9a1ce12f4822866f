pub mod figure;
pub mod grid;
pub mod legend;
pub mod line;
pub mod share;
pub mod spec;
pub mod static_renderer;

pub use figure::Figure;
pub use grid::{AxesCell, AxesGrid};
pub use legend::{Legend, LegendLocation};
pub use line::{DrawOptions, LineHandle, LineId, LineOrigin};
pub use share::ShareMode;
pub use spec::{PlotRequest, PlotSpec, grid_shape};
pub use static_renderer::{
    LineSpec, SeriesInput, StaticRenderer, compute_line_data, fit_limits, series_inputs,
};
