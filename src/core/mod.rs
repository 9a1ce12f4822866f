pub mod range;
pub mod scale;
pub mod series;
pub mod table;
pub mod types;
pub mod windowing;

pub use range::{AutoscaleTuning, AxisRange};
pub use scale::LinearScale;
pub use series::{
    ResolvedSeries, SeriesAxis, SeriesBinding, SeriesRef, SeriesSelection, SeriesTransform,
    TransformSpec,
};
pub use table::Table;
pub use types::{PixelRect, Viewport};
pub use windowing::{index_axis, trailing_window, window_then_transform};
