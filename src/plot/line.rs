use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::AxisRange;
use crate::error::{ScopeError, ScopeResult};
use crate::render::Color;

/// Caller-supplied drawing options.
///
/// `color` and `stroke_width` are honoured by the built-in renderers; `extra`
/// is carried along untouched for custom renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawOptions {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl DrawOptions {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = Some(stroke_width);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn validate(&self) -> ScopeResult<()> {
        if let Some(color) = self.color {
            color.validate()?;
        }
        if let Some(width) = self.stroke_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(ScopeError::Configuration(
                    "line stroke width must be finite and > 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub u32);

/// The (x-series, y-series) pair a line was drawn from.
///
/// `x_index` is `None` for lines plotted against sample index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineOrigin {
    pub x_index: Option<usize>,
    pub y_index: usize,
}

/// One drawn line, owned by exactly one axes cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LineHandle {
    id: LineId,
    origin: LineOrigin,
    label: String,
    x: Vec<f64>,
    y: Vec<f64>,
    options: DrawOptions,
}

impl LineHandle {
    pub(crate) fn new(
        id: LineId,
        origin: LineOrigin,
        label: String,
        x: Vec<f64>,
        y: Vec<f64>,
        options: DrawOptions,
    ) -> ScopeResult<Self> {
        check_lengths(&x, &y)?;
        Ok(Self {
            id,
            origin,
            label,
            x,
            y,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> LineId {
        self.id
    }

    #[must_use]
    pub fn origin(&self) -> LineOrigin {
        self.origin
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Replaces the line data in place.
    pub fn set_data(&mut self, x: Vec<f64>, y: Vec<f64>) -> ScopeResult<()> {
        check_lengths(&x, &y)?;
        self.x = x;
        self.y = y;
        Ok(())
    }

    /// Tight data bounds on both axes, `None` without finite samples.
    #[must_use]
    pub fn bounds(&self) -> (Option<AxisRange>, Option<AxisRange>) {
        (AxisRange::from_samples(&self.x), AxisRange::from_samples(&self.y))
    }
}

fn check_lengths(x: &[f64], y: &[f64]) -> ScopeResult<()> {
    if x.len() != y.len() {
        return Err(ScopeError::MismatchedLength {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    Ok(())
}
