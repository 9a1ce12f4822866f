use crate::core::SeriesTransform;

/// Returns the trailing `window_size` samples.
///
/// `None` keeps every sample; a window larger than the series clamps to the
/// full series.
#[must_use]
pub fn trailing_window(samples: &[f64], window_size: Option<usize>) -> &[f64] {
    match window_size {
        None => samples,
        Some(size) => &samples[samples.len().saturating_sub(size)..],
    }
}

/// Slices to the trailing window first, then transforms only that slice.
#[must_use]
pub fn window_then_transform(
    samples: &[f64],
    window_size: Option<usize>,
    transform: Option<&SeriesTransform>,
) -> Vec<f64> {
    let windowed = trailing_window(samples, window_size);
    match transform {
        Some(transform) => transform.apply(windowed),
        None => windowed.to_vec(),
    }
}

/// Index abscissa `0..len` for series plotted against sample position.
#[must_use]
pub fn index_axis(len: usize) -> Vec<f64> {
    (0..len).map(|index| index as f64).collect()
}
