use std::fmt;
use std::sync::Arc;

use crate::core::Table;
use crate::error::{ScopeError, ScopeResult};

/// Identifies one data series.
///
/// Column references are looked up in the current table on every refresh;
/// inline samples are used verbatim and never re-resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesRef {
    ByName(String),
    ByIndex(usize),
    Inline(Arc<[f64]>),
}

impl From<&str> for SeriesRef {
    fn from(name: &str) -> Self {
        Self::ByName(name.to_owned())
    }
}

impl From<String> for SeriesRef {
    fn from(name: String) -> Self {
        Self::ByName(name)
    }
}

impl From<usize> for SeriesRef {
    fn from(index: usize) -> Self {
        Self::ByIndex(index)
    }
}

impl From<Vec<f64>> for SeriesRef {
    fn from(samples: Vec<f64>) -> Self {
        Self::Inline(samples.into())
    }
}

impl From<Arc<[f64]>> for SeriesRef {
    fn from(samples: Arc<[f64]>) -> Self {
        Self::Inline(samples)
    }
}

/// One or more series identifiers given for an axis.
///
/// A scalar identifier is promoted to a one-element selection. Raw sample
/// vectors have to be wrapped (`vec![samples]` or `SeriesRef::from(samples)`)
/// so they are never mistaken for a list of identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSelection(pub Vec<SeriesRef>);

impl SeriesSelection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<SeriesRef> for SeriesSelection {
    fn from(series: SeriesRef) -> Self {
        Self(vec![series])
    }
}

impl From<&str> for SeriesSelection {
    fn from(name: &str) -> Self {
        Self(vec![name.into()])
    }
}

impl From<String> for SeriesSelection {
    fn from(name: String) -> Self {
        Self(vec![name.into()])
    }
}

impl From<usize> for SeriesSelection {
    fn from(index: usize) -> Self {
        Self(vec![index.into()])
    }
}

impl<T: Into<SeriesRef>> From<Vec<T>> for SeriesSelection {
    fn from(items: Vec<T>) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SeriesRef>, const N: usize> From<[T; N]> for SeriesSelection {
    fn from(items: [T; N]) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }
}

/// Which plot axis a series was requested for; drives synthetic naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesAxis {
    X,
    Y,
}

impl SeriesAxis {
    fn prefix(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesBinding {
    Column(String),
    Inline(Arc<[f64]>),
}

/// A series after identifier resolution, carrying its display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSeries {
    pub name: String,
    pub binding: SeriesBinding,
}

impl ResolvedSeries {
    /// Resolves `series` against `table`. `position` is the index of the
    /// identifier inside its selection.
    pub fn resolve(
        series: &SeriesRef,
        axis: SeriesAxis,
        position: usize,
        table: &Table,
    ) -> ScopeResult<Self> {
        match series {
            SeriesRef::ByName(name) => {
                if table.column(name).is_none() {
                    return Err(ScopeError::UnknownColumn(name.clone()));
                }
                Ok(Self {
                    name: name.clone(),
                    binding: SeriesBinding::Column(name.clone()),
                })
            }
            SeriesRef::ByIndex(index) => {
                let (name, _) = table.column_at(*index).ok_or_else(|| {
                    ScopeError::UnknownColumn(format!(
                        "column index {index} out of range for {} columns",
                        table.column_count()
                    ))
                })?;
                Ok(Self {
                    name: name.to_owned(),
                    binding: SeriesBinding::Column(name.to_owned()),
                })
            }
            SeriesRef::Inline(samples) => Ok(Self {
                name: format!("{}_{position}", axis.prefix()),
                binding: SeriesBinding::Inline(Arc::clone(samples)),
            }),
        }
    }

    /// Current samples of this series.
    pub fn samples<'a>(&'a self, table: &'a Table) -> ScopeResult<&'a [f64]> {
        match &self.binding {
            SeriesBinding::Column(name) => table
                .column(name)
                .ok_or_else(|| ScopeError::UnknownColumn(name.clone())),
            SeriesBinding::Inline(samples) => Ok(samples),
        }
    }
}

/// Vectorized per-series transform applied to a windowed slice.
#[derive(Clone)]
pub struct SeriesTransform(Arc<dyn Fn(&[f64]) -> Vec<f64> + Send + Sync>);

impl SeriesTransform {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        Self(Arc::new(transform))
    }

    /// Element-wise transform convenience.
    pub fn map<F>(transform: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(move |samples| samples.iter().map(|&value| transform(value)).collect())
    }

    #[must_use]
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        (self.0)(samples)
    }
}

impl fmt::Debug for SeriesTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeriesTransform(..)")
    }
}

/// Transform argument of a plot call: none, one broadcast to every series,
/// or one optional transform per identifier.
#[derive(Debug, Clone, Default)]
pub enum TransformSpec {
    #[default]
    Identity,
    Broadcast(SeriesTransform),
    PerSeries(Vec<Option<SeriesTransform>>),
}

impl TransformSpec {
    /// Expands to exactly `len` entries.
    pub fn expand(&self, len: usize) -> ScopeResult<Vec<Option<SeriesTransform>>> {
        match self {
            Self::Identity => Ok(vec![None; len]),
            Self::Broadcast(transform) => Ok(vec![Some(transform.clone()); len]),
            Self::PerSeries(transforms) => {
                if transforms.len() != len {
                    return Err(ScopeError::Configuration(format!(
                        "{} transforms given for {len} series",
                        transforms.len()
                    )));
                }
                Ok(transforms.clone())
            }
        }
    }
}

impl From<SeriesTransform> for TransformSpec {
    fn from(transform: SeriesTransform) -> Self {
        Self::Broadcast(transform)
    }
}

impl From<Vec<Option<SeriesTransform>>> for TransformSpec {
    fn from(transforms: Vec<Option<SeriesTransform>>) -> Self {
        Self::PerSeries(transforms)
    }
}
