use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// Which grid cells share one axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareMode {
    /// Every cell has its own scale.
    #[default]
    None,
    /// Every cell shares the scale of cell 0.
    All,
    /// Cells share the scale of the first cell of their row.
    Row,
    /// Cells share the scale of the top cell of their column.
    Col,
}

impl ShareMode {
    pub const VALUES: [&'static str; 4] = ["all", "row", "col", "none"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::All => "all",
            Self::Row => "row",
            Self::Col => "col",
        }
    }

    /// Row-major index of the cell whose scale each cell follows.
    #[must_use]
    pub fn leaders(self, rows: usize, cols: usize) -> Vec<usize> {
        (0..rows * cols)
            .map(|index| match self {
                Self::None => index,
                Self::All => 0,
                Self::Row => (index / cols) * cols,
                Self::Col => index % cols,
            })
            .collect()
    }
}

impl From<bool> for ShareMode {
    fn from(shared: bool) -> Self {
        if shared { Self::All } else { Self::None }
    }
}

impl FromStr for ShareMode {
    type Err = ScopeError;

    fn from_str(value: &str) -> ScopeResult<Self> {
        match value {
            "none" => Ok(Self::None),
            "all" => Ok(Self::All),
            "row" => Ok(Self::Row),
            "col" => Ok(Self::Col),
            other => Err(ScopeError::Configuration(format!(
                "share mode `{other}` must be one of {:?}",
                Self::VALUES
            ))),
        }
    }
}

impl fmt::Display for ShareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
