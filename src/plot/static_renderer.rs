use tracing::{debug, trace};

use crate::core::{
    AutoscaleTuning, ResolvedSeries, SeriesTransform, Table, index_axis, window_then_transform,
};
use crate::error::{ScopeError, ScopeResult};

use super::grid::merge;
use super::{AxesCell, AxesGrid, DrawOptions, LineHandle, LineId, LineOrigin, PlotSpec};

/// One series plus the transform applied to its windowed slice.
#[derive(Debug, Clone, Copy)]
pub struct SeriesInput<'a> {
    pub series: &'a ResolvedSeries,
    pub transform: Option<&'a SeriesTransform>,
}

/// Everything needed to draw a single line into a cell.
#[derive(Debug, Clone, Copy)]
pub struct LineSpec<'a> {
    pub origin: LineOrigin,
    /// `None` plots `y` against sample index.
    pub x: Option<SeriesInput<'a>>,
    pub y: SeriesInput<'a>,
    pub window_size: Option<usize>,
    pub options: &'a DrawOptions,
}

impl LineSpec<'_> {
    #[must_use]
    pub fn label(&self) -> String {
        match self.x {
            None => self.y.series.name.clone(),
            Some(x) => format!("{} (x) vs {} (y)", x.series.name, self.y.series.name),
        }
    }
}

/// Computes the `(x, y)` data of a line from the current table.
///
/// Each series is cut to its trailing window before its transform runs.
/// Index-based lines get `0..len(y)` as x data.
pub fn compute_line_data(
    table: &Table,
    x: Option<SeriesInput<'_>>,
    y: SeriesInput<'_>,
    window_size: Option<usize>,
) -> ScopeResult<(Vec<f64>, Vec<f64>)> {
    let y_samples = y.series.samples(table)?;
    match x {
        None => {
            let y_data = window_then_transform(y_samples, window_size, y.transform);
            Ok((index_axis(y_data.len()), y_data))
        }
        Some(x) => {
            let x_samples = x.series.samples(table)?;
            if x_samples.len() != y_samples.len() {
                return Err(ScopeError::MismatchedLength {
                    x_len: x_samples.len(),
                    y_len: y_samples.len(),
                });
            }
            let x_data = window_then_transform(x_samples, window_size, x.transform);
            let y_data = window_then_transform(y_samples, window_size, y.transform);
            if x_data.len() != y_data.len() {
                return Err(ScopeError::MismatchedLength {
                    x_len: x_data.len(),
                    y_len: y_data.len(),
                });
            }
            Ok((x_data, y_data))
        }
    }
}

/// One-shot line drawing into an axes grid.
#[derive(Debug, Clone, Default)]
pub struct StaticRenderer {
    tuning: AutoscaleTuning,
    next_id: u32,
}

impl StaticRenderer {
    #[must_use]
    pub fn new(tuning: AutoscaleTuning) -> Self {
        Self { tuning, next_id: 0 }
    }

    /// Draws exactly one line into `cell` and returns its id.
    pub fn draw_line(
        &mut self,
        cell: &mut AxesCell,
        table: &Table,
        line: LineSpec<'_>,
    ) -> ScopeResult<LineId> {
        let (x, y) = compute_line_data(table, line.x, line.y, line.window_size)?;
        let id = LineId(self.next_id);
        let handle = LineHandle::new(id, line.origin, line.label(), x, y, line.options.clone())?;
        trace!(
            line = id.0,
            label = handle.label(),
            samples = handle.len(),
            window = ?line.window_size,
            "drew line"
        );
        self.next_id += 1;
        cell.push_line(handle);
        Ok(id)
    }

    /// Builds a complete grid for `spec`.
    ///
    /// Nothing is returned on error, so a failed draw never exposes a
    /// partially populated grid.
    pub fn draw(&mut self, spec: &PlotSpec, table: &Table) -> ScopeResult<AxesGrid> {
        let mut grid = spec.build_grid()?;
        let legend = spec.legend.location();

        let pairs: Vec<(Option<usize>, usize)> = if spec.one_d {
            (0..spec.ys.len()).map(|j| (None, j)).collect()
        } else {
            (0..spec.xs.len())
                .flat_map(|i| (0..spec.ys.len()).map(move |j| (Some(i), j)))
                .collect()
        };

        for (x_index, y_index) in pairs {
            let (row, col) = spec.cell_for(x_index, y_index);
            let origin = LineOrigin { x_index, y_index };
            let (x, y) = series_inputs(spec, origin)?;
            let cell = grid.cell_mut(row, col).ok_or_else(|| {
                ScopeError::InvalidData(format!("cell ({row}, {col}) outside of axes grid"))
            })?;
            self.draw_line(
                cell,
                table,
                LineSpec {
                    origin,
                    x,
                    y,
                    window_size: spec.window_size,
                    options: &spec.options,
                },
            )?;
            cell.set_legend(legend);
        }

        fit_limits(&mut grid, self.tuning);
        debug!(
            rows = grid.shape().0,
            cols = grid.shape().1,
            lines = grid.line_count(),
            "drew static plot"
        );
        Ok(grid)
    }
}

/// Series and transforms feeding the line drawn for `origin`.
pub fn series_inputs(
    spec: &PlotSpec,
    origin: LineOrigin,
) -> ScopeResult<(Option<SeriesInput<'_>>, SeriesInput<'_>)> {
    let missing = || {
        ScopeError::InvalidData(format!(
            "line origin ({:?}, {}) does not belong to this plot",
            origin.x_index, origin.y_index
        ))
    };
    let x = match origin.x_index {
        None => None,
        Some(i) => Some(SeriesInput {
            series: spec.xs.get(i).ok_or_else(missing)?,
            transform: spec.x_transforms.get(i).and_then(Option::as_ref),
        }),
    };
    let y = SeriesInput {
        series: spec.ys.get(origin.y_index).ok_or_else(missing)?,
        transform: spec.y_transforms.get(origin.y_index).and_then(Option::as_ref),
    };
    Ok((x, y))
}

/// Sets every axis to its share-group data bounds plus the tuning margin.
pub fn fit_limits(grid: &mut AxesGrid, tuning: AutoscaleTuning) {
    for index in 0..grid.cells().len() {
        let x_bounds = grid
            .x_group(index)
            .into_iter()
            .fold(None, |acc, member| merge(acc, grid.cells()[member].data_bounds().0));
        let y_bounds = grid
            .y_group(index)
            .into_iter()
            .fold(None, |acc, member| merge(acc, grid.cells()[member].data_bounds().1));
        if let Some(bounds) = x_bounds {
            grid.set_x_limits(index, bounds.fitted(tuning));
        }
        if let Some(bounds) = y_bounds {
            grid.set_y_limits(index, bounds.fitted(tuning));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SeriesBinding, SeriesRef, TransformSpec};
    use crate::plot::{PlotRequest, ShareMode};

    fn table() -> Table {
        Table::from_columns([
            ("t", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", vec![0.0, 10.0, 0.0, 10.0, 0.0]),
        ])
        .expect("table")
    }

    #[test]
    fn window_is_cut_before_transform() {
        let series = ResolvedSeries {
            name: "a".to_owned(),
            binding: SeriesBinding::Column("a".to_owned()),
        };
        let scale = SeriesTransform::map(|v| v * 10.0);
        let (x, y) = compute_line_data(
            &table(),
            None,
            SeriesInput {
                series: &series,
                transform: Some(&scale),
            },
            Some(2),
        )
        .expect("line data");
        assert_eq!(y, vec![40.0, 50.0]);
        assert_eq!(x, vec![0.0, 1.0]);
    }

    #[test]
    fn mismatched_inline_lengths_draw_nothing() {
        let request = PlotRequest::new()
            .x(SeriesRef::from(vec![0.0, 1.0]))
            .y("a");
        let spec = PlotSpec::resolve(&request, &table()).expect("spec");
        let mut renderer = StaticRenderer::default();
        let err = renderer.draw(&spec, &table()).expect_err("must fail");
        assert!(matches!(
            err,
            ScopeError::MismatchedLength { x_len: 2, y_len: 5 }
        ));
    }

    #[test]
    fn unsplit_lines_land_in_one_cell_with_sequential_ids() {
        let request = PlotRequest::new()
            .x(["t", "a"])
            .y(["a", "b"])
            .split_x(false)
            .split_y(false)
            .share_x(ShareMode::None)
            .y_transform(TransformSpec::Identity)
            .legend(true);
        let spec = PlotSpec::resolve(&request, &table()).expect("spec");
        let grid = StaticRenderer::default().draw(&spec, &table()).expect("grid");
        assert_eq!(grid.shape(), (1, 1));
        let ids: Vec<u32> = grid.lines().map(|line| line.id().0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        let labels: Vec<&str> = grid.lines().map(LineHandle::label).collect();
        assert_eq!(labels[1], "t (x) vs b (y)");
        assert!(grid.cells()[0].legend().is_some());
    }

    #[test]
    fn initial_limits_cover_data_with_margin() {
        let request = PlotRequest::new().y("b");
        let spec = PlotSpec::resolve(&request, &table()).expect("spec");
        let grid = StaticRenderer::default().draw(&spec, &table()).expect("grid");
        let limits = grid.y_limits(0);
        assert!(limits.min <= -1.0 + 1e-9);
        assert!(limits.max >= 11.0 - 1e-9);
    }
}
