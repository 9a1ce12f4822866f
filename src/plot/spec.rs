use tracing::debug;

use crate::core::{
    ResolvedSeries, SeriesAxis, SeriesSelection, SeriesTransform, Table, TransformSpec,
};
use crate::error::{ScopeError, ScopeResult};

use super::{AxesGrid, DrawOptions, Legend, ShareMode};

/// Arguments of one `plot` call.
///
/// Defaults: both axes split, x shared per column, y unshared, no legend,
/// no transforms, full-length window, both axes autoscaled.
#[derive(Debug, Clone)]
pub struct PlotRequest {
    pub xs: Option<SeriesSelection>,
    pub ys: Option<SeriesSelection>,
    pub split_x: bool,
    pub split_y: bool,
    pub share_x: ShareMode,
    pub share_y: ShareMode,
    pub x_transforms: TransformSpec,
    pub y_transforms: TransformSpec,
    pub legend: Legend,
    pub window_size: Option<usize>,
    pub autoscale_x: bool,
    pub autoscale_y: bool,
    pub options: DrawOptions,
}

impl Default for PlotRequest {
    fn default() -> Self {
        Self {
            xs: None,
            ys: None,
            split_x: true,
            split_y: true,
            share_x: ShareMode::Col,
            share_y: ShareMode::None,
            x_transforms: TransformSpec::Identity,
            y_transforms: TransformSpec::Identity,
            legend: Legend::Hidden,
            window_size: None,
            autoscale_x: true,
            autoscale_y: true,
            options: DrawOptions::default(),
        }
    }
}

impl PlotRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn x(mut self, xs: impl Into<SeriesSelection>) -> Self {
        self.xs = Some(xs.into());
        self
    }

    #[must_use]
    pub fn y(mut self, ys: impl Into<SeriesSelection>) -> Self {
        self.ys = Some(ys.into());
        self
    }

    #[must_use]
    pub fn split_x(mut self, split: bool) -> Self {
        self.split_x = split;
        self
    }

    #[must_use]
    pub fn split_y(mut self, split: bool) -> Self {
        self.split_y = split;
        self
    }

    #[must_use]
    pub fn share_x(mut self, mode: impl Into<ShareMode>) -> Self {
        self.share_x = mode.into();
        self
    }

    #[must_use]
    pub fn share_y(mut self, mode: impl Into<ShareMode>) -> Self {
        self.share_y = mode.into();
        self
    }

    #[must_use]
    pub fn x_transform(mut self, transforms: impl Into<TransformSpec>) -> Self {
        self.x_transforms = transforms.into();
        self
    }

    #[must_use]
    pub fn y_transform(mut self, transforms: impl Into<TransformSpec>) -> Self {
        self.y_transforms = transforms.into();
        self
    }

    #[must_use]
    pub fn legend(mut self, legend: impl Into<Legend>) -> Self {
        self.legend = legend.into();
        self
    }

    #[must_use]
    pub fn window_size(mut self, window_size: Option<usize>) -> Self {
        self.window_size = window_size;
        self
    }

    #[must_use]
    pub fn autoscale(mut self, x: bool, y: bool) -> Self {
        self.autoscale_x = x;
        self.autoscale_y = y;
        self
    }

    #[must_use]
    pub fn options(mut self, options: DrawOptions) -> Self {
        self.options = options;
        self
    }
}

/// Axes-grid shape `(rows, cols)` for the given selection sizes.
///
/// `xs_len` is `None` when series are plotted against index.
#[must_use]
pub fn grid_shape(
    xs_len: Option<usize>,
    ys_len: usize,
    split_x: bool,
    split_y: bool,
) -> (usize, usize) {
    let rows = if split_y { ys_len } else { 1 };
    let cols = match xs_len {
        Some(len) if split_x => len,
        _ => 1,
    };
    (rows, cols)
}

/// Fully resolved layout and series of one plot call.
#[derive(Debug, Clone)]
pub struct PlotSpec {
    pub one_d: bool,
    pub xs: Vec<ResolvedSeries>,
    pub ys: Vec<ResolvedSeries>,
    pub x_transforms: Vec<Option<SeriesTransform>>,
    pub y_transforms: Vec<Option<SeriesTransform>>,
    pub split_x: bool,
    pub split_y: bool,
    pub share_x: ShareMode,
    pub share_y: ShareMode,
    pub legend: Legend,
    pub window_size: Option<usize>,
    pub autoscale_x: bool,
    pub autoscale_y: bool,
    pub options: DrawOptions,
}

impl PlotSpec {
    pub fn resolve(request: &PlotRequest, table: &Table) -> ScopeResult<Self> {
        // A lone x selection is plotted against index like a lone y selection.
        let (one_d, xs, ys, y_spec) = match (&request.xs, &request.ys) {
            (None, None) => {
                return Err(ScopeError::Configuration(
                    "must specify at least one of xs or ys".to_owned(),
                ));
            }
            (Some(xs), None) => (true, None, xs, &request.x_transforms),
            (None, Some(ys)) => (true, None, ys, &request.y_transforms),
            (Some(xs), Some(ys)) => (false, Some(xs), ys, &request.y_transforms),
        };

        if ys.is_empty() || xs.is_some_and(SeriesSelection::is_empty) {
            return Err(ScopeError::Configuration(
                "series selections must not be empty".to_owned(),
            ));
        }

        request.options.validate()?;

        let resolved_xs = match xs {
            Some(xs) => resolve_all(xs, SeriesAxis::X, table)?,
            None => Vec::new(),
        };
        let resolved_ys = resolve_all(ys, SeriesAxis::Y, table)?;
        let x_transforms = if one_d {
            Vec::new()
        } else {
            request.x_transforms.expand(resolved_xs.len())?
        };
        let y_transforms = y_spec.expand(resolved_ys.len())?;

        debug!(
            one_d,
            xs = resolved_xs.len(),
            ys = resolved_ys.len(),
            split_x = request.split_x,
            split_y = request.split_y,
            "resolved plot spec"
        );

        Ok(Self {
            one_d,
            xs: resolved_xs,
            ys: resolved_ys,
            x_transforms,
            y_transforms,
            split_x: request.split_x,
            split_y: request.split_y,
            share_x: request.share_x,
            share_y: request.share_y,
            legend: request.legend,
            window_size: request.window_size,
            autoscale_x: request.autoscale_x,
            autoscale_y: request.autoscale_y,
            options: request.options.clone(),
        })
    }

    #[must_use]
    pub fn grid_shape(&self) -> (usize, usize) {
        let xs_len = (!self.one_d).then_some(self.xs.len());
        grid_shape(xs_len, self.ys.len(), self.split_x, self.split_y)
    }

    pub fn build_grid(&self) -> ScopeResult<AxesGrid> {
        let (rows, cols) = self.grid_shape();
        AxesGrid::new(rows, cols, self.share_x, self.share_y)
    }

    /// Grid cell `(row, col)` receiving the line for this series pair.
    #[must_use]
    pub fn cell_for(&self, x_index: Option<usize>, y_index: usize) -> (usize, usize) {
        let row = if self.split_y { y_index } else { 0 };
        let col = match x_index {
            Some(index) if self.split_x && !self.one_d => index,
            _ => 0,
        };
        (row, col)
    }
}

fn resolve_all(
    selection: &SeriesSelection,
    axis: SeriesAxis,
    table: &Table,
) -> ScopeResult<Vec<ResolvedSeries>> {
    selection
        .0
        .iter()
        .enumerate()
        .map(|(position, series)| ResolvedSeries::resolve(series, axis, position, table))
        .collect()
}
