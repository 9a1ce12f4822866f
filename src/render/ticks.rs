use crate::core::AxisRange;

/// Up to `max_ticks` evenly spaced "nice" values (1, 2, 5 x 10^n steps)
/// inside `range`.
#[must_use]
pub fn nice_ticks(range: AxisRange, max_ticks: usize) -> Vec<f64> {
    if max_ticks == 0 || !range.is_valid() {
        return Vec::new();
    }
    if max_ticks == 1 {
        return vec![range.midpoint()];
    }

    let raw_step = range.span() / (max_ticks - 1) as f64;
    let step = nice_step(raw_step);
    let first = (range.min / step).ceil() * step;

    let mut ticks = Vec::with_capacity(max_ticks);
    let mut value = first;
    while value <= range.max + step * 1e-9 && ticks.len() < max_ticks {
        // Snap values like 0.30000000000000004 back to the step grid.
        let snapped = (value / step).round() * step;
        ticks.push(if snapped == 0.0 { 0.0 } else { snapped });
        value += step;
    }
    ticks
}

fn nice_step(raw_step: f64) -> f64 {
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Compact label for a tick value.
#[must_use]
pub fn format_tick(value: f64) -> String {
    let abs = value.abs();
    if abs != 0.0 && !(1e-3..1e6).contains(&abs) {
        return format!("{value:.2e}");
    }
    let text = format!("{value:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_owned()
    } else {
        text.to_owned()
    }
}
