use crate::core::AxisRange;
use crate::error::{ScopeError, ScopeResult};

/// Linear mapping from a data domain onto a pixel span.
///
/// The pixel span may be reversed (`pixel_start > pixel_end`), which is how
/// the Y axis maps larger values upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    pixel_start: f64,
    pixel_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        pixel_start: f64,
        pixel_end: f64,
    ) -> ScopeResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ScopeError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() || pixel_start == pixel_end {
            return Err(ScopeError::InvalidData(
                "scale pixel span must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            pixel_start,
            pixel_end,
        })
    }

    pub fn from_range(range: AxisRange, pixel_start: f64, pixel_end: f64) -> ScopeResult<Self> {
        Self::new(range.min, range.max, pixel_start, pixel_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ScopeResult<f64> {
        if !value.is_finite() {
            return Err(ScopeError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.pixel_start + normalized * (self.pixel_end - self.pixel_start))
    }
}
