use proptest::prelude::*;
use scope_rs::core::{
    AutoscaleTuning, AxisRange, SeriesTransform, Table, trailing_window, window_then_transform,
};
use scope_rs::plot::{AxesGrid, PlotRequest, PlotSpec, ShareMode, StaticRenderer, grid_shape};
use scope_rs::realtime::autoscale_axes;

fn share_mode() -> impl Strategy<Value = ShareMode> {
    prop_oneof![
        Just(ShareMode::None),
        Just(ShareMode::All),
        Just(ShareMode::Row),
        Just(ShareMode::Col),
    ]
}

proptest! {
    #[test]
    fn grid_shape_matches_split_rules(
        xs in 1usize..6,
        ys in 1usize..6,
        one_d in any::<bool>(),
        split_x in any::<bool>(),
        split_y in any::<bool>()
    ) {
        let xs_len = (!one_d).then_some(xs);
        let (rows, cols) = grid_shape(xs_len, ys, split_x, split_y);
        prop_assert_eq!(rows, if split_y { ys } else { 1 });
        prop_assert_eq!(cols, if split_x && !one_d { xs } else { 1 });
    }

    #[test]
    fn every_series_pair_lands_in_exactly_one_cell(
        xs in 1usize..4,
        ys in 1usize..4,
        split_x in any::<bool>(),
        split_y in any::<bool>(),
        share_x in share_mode(),
        share_y in share_mode()
    ) {
        let columns = (0..xs + ys).map(|index| (format!("s{index}"), vec![index as f64, 1.0, 2.0]));
        let table = Table::from_columns(columns).expect("table");
        let x_names = (0..xs).map(|index| format!("s{index}")).collect::<Vec<_>>();
        let y_names = (xs..xs + ys).map(|index| format!("s{index}")).collect::<Vec<_>>();
        let request = PlotRequest::new()
            .x(x_names)
            .y(y_names)
            .split_x(split_x)
            .split_y(split_y)
            .share_x(share_x)
            .share_y(share_y);
        let spec = PlotSpec::resolve(&request, &table).expect("resolve");
        let grid = StaticRenderer::default().draw(&spec, &table).expect("draw");

        prop_assert_eq!(grid.shape(), grid_shape(Some(xs), ys, split_x, split_y));
        prop_assert_eq!(grid.line_count(), xs * ys);
        let mut ids = grid.lines().map(|line| line.id().0).collect::<Vec<_>>();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..(xs * ys) as u32).collect::<Vec<_>>());
    }

    #[test]
    fn trailing_window_is_idempotent_and_clamped(
        samples in prop::collection::vec(-1e6f64..1e6, 0..64),
        window in proptest::option::of(0usize..80)
    ) {
        let once = trailing_window(&samples, window);
        let twice = trailing_window(once, window);
        prop_assert_eq!(once, twice);
        let expected_len = window.map_or(samples.len(), |size| size.min(samples.len()));
        prop_assert_eq!(once.len(), expected_len);
        prop_assert_eq!(once, &samples[samples.len() - expected_len..]);
    }

    #[test]
    fn transform_only_sees_the_window(
        samples in prop::collection::vec(-1e3f64..1e3, 1..64),
        window in 1usize..16
    ) {
        let transform = SeriesTransform::new(|slice| vec![slice.len() as f64]);
        let out = window_then_transform(&samples, Some(window), Some(&transform));
        prop_assert_eq!(out, vec![window.min(samples.len()) as f64]);
    }

    #[test]
    fn autoscale_keeps_data_inside_limits_with_margin(
        initial in prop::collection::vec(-100.0f64..100.0, 2..16),
        fresh in prop::collection::vec(-1e4f64..1e4, 2..16)
    ) {
        let len = initial.len().min(fresh.len());
        let table = Table::from_columns([("v", initial[..len].to_vec())]).expect("table");
        let spec = PlotSpec::resolve(&PlotRequest::new().y("v"), &table).expect("resolve");
        let mut grid: AxesGrid = StaticRenderer::default().draw(&spec, &table).expect("draw");

        let y = fresh[..len].to_vec();
        let x = (0..len).map(|index| index as f64).collect::<Vec<_>>();
        grid.cells_mut()[0].lines_mut()[0].set_data(x, y.clone()).expect("set data");
        let tuning = AutoscaleTuning::default();
        autoscale_axes(&mut grid, true, true, tuning);

        let data = AxisRange::from_samples(&y).expect("bounds");
        let limits = grid.y_limits(0);
        prop_assert!(limits.min <= data.min && limits.max >= data.max);
        prop_assert!(!limits.needs_rescale(data));
        // A second pass over settled limits changes nothing.
        prop_assert_eq!(autoscale_axes(&mut grid, true, true, tuning), 0);
    }
}
