use tracing::trace;

use crate::core::{AutoscaleTuning, AxisRange};
use crate::plot::AxesGrid;

fn group_bounds(
    grid: &AxesGrid,
    group: Vec<usize>,
    pick: impl Fn((Option<AxisRange>, Option<AxisRange>)) -> Option<AxisRange>,
) -> Option<AxisRange> {
    group
        .into_iter()
        .filter_map(|member| pick(grid.cells()[member].data_bounds()))
        .reduce(AxisRange::union)
}

/// Rescales every enabled axis whose data escaped its limits or collapsed
/// inside them.
///
/// Bounds are taken over the axis' whole share group and written to the
/// group leader. Returns the number of axes that were rescaled.
pub fn autoscale_axes(
    grid: &mut AxesGrid,
    autoscale_x: bool,
    autoscale_y: bool,
    tuning: AutoscaleTuning,
) -> usize {
    if !autoscale_x && !autoscale_y {
        return 0;
    }

    let mut rescaled = 0;
    for index in 0..grid.cells().len() {
        if autoscale_x {
            let bounds = group_bounds(grid, grid.x_group(index), |(x, _)| x);
            if let Some(bounds) = bounds {
                let current = grid.x_limits(index);
                if current.needs_rescale(bounds) {
                    let limits = bounds.fitted(tuning);
                    trace!(cell = index, axis = "x", min = limits.min, max = limits.max, "rescaled");
                    grid.set_x_limits(index, limits);
                    rescaled += 1;
                }
            }
        }
        if autoscale_y {
            let bounds = group_bounds(grid, grid.y_group(index), |(_, y)| y);
            if let Some(bounds) = bounds {
                let current = grid.y_limits(index);
                if current.needs_rescale(bounds) {
                    let limits = bounds.fitted(tuning);
                    trace!(cell = index, axis = "y", min = limits.min, max = limits.max, "rescaled");
                    grid.set_y_limits(index, limits);
                    rescaled += 1;
                }
            }
        }
    }
    rescaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Table;
    use crate::plot::{PlotRequest, PlotSpec, ShareMode, StaticRenderer};

    fn grid_for(table: &Table, request: PlotRequest) -> AxesGrid {
        let spec = PlotSpec::resolve(&request, table).expect("spec");
        StaticRenderer::default().draw(&spec, table).expect("grid")
    }

    #[test]
    fn disabled_axes_are_left_alone() {
        let table = Table::from_columns([("a", vec![0.0, 10.0])]).expect("table");
        let mut grid = grid_for(&table, PlotRequest::new().y("a"));
        grid.set_y_limits(0, AxisRange::new(100.0, 200.0));
        assert_eq!(autoscale_axes(&mut grid, false, false, AutoscaleTuning::default()), 0);
        assert_eq!(grid.y_limits(0), AxisRange::new(100.0, 200.0));
    }

    #[test]
    fn escaped_data_is_refitted_with_margin() {
        let table = Table::from_columns([("a", vec![0.0, 10.0])]).expect("table");
        let mut grid = grid_for(&table, PlotRequest::new().y("a"));
        grid.set_y_limits(0, AxisRange::new(2.0, 4.0));
        autoscale_axes(&mut grid, false, true, AutoscaleTuning::default());
        let limits = grid.y_limits(0);
        assert!(limits.min <= -1.0 + 1e-9);
        assert!(limits.max >= 11.0 - 1e-9);
    }

    #[test]
    fn settled_limits_are_stable() {
        let table = Table::from_columns([("a", vec![0.0, 10.0])]).expect("table");
        let mut grid = grid_for(&table, PlotRequest::new().y("a"));
        assert_eq!(autoscale_axes(&mut grid, true, true, AutoscaleTuning::default()), 0);
    }

    #[test]
    fn shared_axis_covers_the_whole_group() {
        let table = Table::from_columns([
            ("t", vec![0.0, 1.0]),
            ("a", vec![0.0, 1.0]),
            ("b", vec![50.0, 100.0]),
        ])
        .expect("table");
        let mut grid = grid_for(
            &table,
            PlotRequest::new().x("t").y(["a", "b"]).share_y(ShareMode::All),
        );
        grid.set_y_limits(0, AxisRange::new(0.0, 1.0));
        autoscale_axes(&mut grid, false, true, AutoscaleTuning::default());
        let limits = grid.y_limits(1);
        assert_eq!(grid.y_limits(0), limits);
        assert!(limits.min <= -10.0 + 1e-9);
        assert!(limits.max >= 110.0 - 1e-9);
    }
}
