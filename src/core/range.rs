use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// Tuning controls for fitting axis limits to data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoscaleTuning {
    /// Fraction of the data span added on each side.
    pub margin_ratio: f64,
    /// Half width used when all samples share one value.
    pub degenerate_half_span: f64,
}

impl Default for AutoscaleTuning {
    fn default() -> Self {
        Self {
            margin_ratio: 0.10,
            degenerate_half_span: 0.5,
        }
    }
}

impl AutoscaleTuning {
    pub fn validate(self) -> ScopeResult<Self> {
        if !self.margin_ratio.is_finite() || self.margin_ratio < 0.0 {
            return Err(ScopeError::Configuration(
                "autoscale margin ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.degenerate_half_span.is_finite() || self.degenerate_half_span <= 0.0 {
            return Err(ScopeError::Configuration(
                "autoscale degenerate half span must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Smallest pad, relative to the bounds' magnitude, that survives rounding.
const RELATIVE_PAD: f64 = f64::EPSILON * 64.0;

/// Inclusive numeric interval used for axis limits and data bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Creates a range, swapping bounds if needed.
    #[must_use]
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Finite bounds with a strictly positive span.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Tight bounds of the finite samples, `None` when there are none.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for &value in samples {
            if !value.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => Self {
                    min: value,
                    max: value,
                },
                Some(existing) => Self {
                    min: existing.min.min(value),
                    max: existing.max.max(value),
                },
            });
        }
        bounds
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Widens both ends by `margin_ratio * span`.
    ///
    /// A zero-width range is widened by `degenerate_half_span` instead. The
    /// pad never drops below a few ulps of the bounds' magnitude, so the
    /// result can back a scale even for values like epoch nanoseconds.
    #[must_use]
    pub fn padded(self, margin_ratio: f64, degenerate_half_span: f64) -> Self {
        let span = self.span();
        let pad = if span > 0.0 {
            span * margin_ratio
        } else {
            degenerate_half_span
        };
        let pad = pad.max(self.min.abs().max(self.max.abs()) * RELATIVE_PAD);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Data bounds widened by the tuning margin.
    #[must_use]
    pub fn fitted(self, tuning: AutoscaleTuning) -> Self {
        self.padded(tuning.margin_ratio, tuning.degenerate_half_span)
    }

    /// Rescale test used by the realtime autoscale policy.
    ///
    /// Triggers when data escapes the current limits, and when the data
    /// minimum lies above (or the maximum below) the current midpoint.
    #[must_use]
    pub fn needs_rescale(self, data: Self) -> bool {
        let mid = self.midpoint();
        data.min < self.min || data.min > mid || data.max > self.max || data.max < mid
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_samples_skips_non_finite_values() {
        let bounds = AxisRange::from_samples(&[f64::NAN, 3.0, -1.0, f64::INFINITY]);
        assert_eq!(bounds, Some(AxisRange::new(-1.0, 3.0)));
        assert_eq!(AxisRange::from_samples(&[f64::NAN]), None);
    }

    #[test]
    fn padded_degenerate_range_gets_fallback_width() {
        let padded = AxisRange::new(2.0, 2.0).padded(0.1, 0.5);
        assert!((padded.min - 1.5).abs() <= 1e-12);
        assert!((padded.max - 2.5).abs() <= 1e-12);
    }

    #[test]
    fn padded_large_magnitude_range_keeps_positive_span() {
        let stamp = AxisRange::new(1.7e18, 1.7e18).fitted(AutoscaleTuning::default());
        assert!(stamp.is_valid(), "{stamp:?}");
        assert!(stamp.min < 1.7e18 && stamp.max > 1.7e18);

        let level = AxisRange::new(-1e17, -1e17).padded(0.1, 0.5);
        assert!(level.is_valid(), "{level:?}");
    }

    #[test]
    fn padded_ordinary_range_is_unchanged_by_relative_floor() {
        let padded = AxisRange::new(0.0, 10.0).padded(0.1, 0.5);
        assert_eq!(padded, AxisRange::new(-1.0, 11.0));
    }

    #[test]
    fn rescale_triggers_on_growth_and_collapse() {
        let current = AxisRange::new(0.0, 10.0);
        assert!(current.needs_rescale(AxisRange::new(-1.0, 9.0)));
        assert!(current.needs_rescale(AxisRange::new(6.0, 9.0)));
        assert!(current.needs_rescale(AxisRange::new(1.0, 4.0)));
        assert!(!current.needs_rescale(AxisRange::new(1.0, 9.0)));
    }
}
