use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLocation {
    Best,
    #[default]
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

impl LegendLocation {
    /// Anchor as fractions of the axes box, `(0, 0)` being top-left.
    ///
    /// `Best` has no placement search and resolves like `UpperRight`.
    #[must_use]
    pub fn anchor(self) -> (f64, f64) {
        match self {
            Self::Best | Self::UpperRight => (1.0, 0.0),
            Self::UpperLeft => (0.0, 0.0),
            Self::LowerLeft => (0.0, 1.0),
            Self::LowerRight => (1.0, 1.0),
            Self::Right | Self::CenterRight => (1.0, 0.5),
            Self::CenterLeft => (0.0, 0.5),
            Self::LowerCenter => (0.5, 1.0),
            Self::UpperCenter => (0.5, 0.0),
            Self::Center => (0.5, 0.5),
        }
    }
}

impl FromStr for LegendLocation {
    type Err = ScopeError;

    fn from_str(value: &str) -> ScopeResult<Self> {
        match value.trim() {
            "best" => Ok(Self::Best),
            "upper right" => Ok(Self::UpperRight),
            "upper left" => Ok(Self::UpperLeft),
            "lower left" => Ok(Self::LowerLeft),
            "lower right" => Ok(Self::LowerRight),
            "right" => Ok(Self::Right),
            "center left" => Ok(Self::CenterLeft),
            "center right" => Ok(Self::CenterRight),
            "lower center" => Ok(Self::LowerCenter),
            "upper center" => Ok(Self::UpperCenter),
            "center" => Ok(Self::Center),
            other => Err(ScopeError::Configuration(format!(
                "unrecognized legend location `{other}`"
            ))),
        }
    }
}

/// Legend request of a plot call; one location is shared by all cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Legend {
    #[default]
    Hidden,
    Shown(LegendLocation),
}

impl Legend {
    #[must_use]
    pub fn location(self) -> Option<LegendLocation> {
        match self {
            Self::Hidden => None,
            Self::Shown(location) => Some(location),
        }
    }
}

impl From<bool> for Legend {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Shown(LegendLocation::default())
        } else {
            Self::Hidden
        }
    }
}

impl From<LegendLocation> for Legend {
    fn from(location: LegendLocation) -> Self {
        Self::Shown(location)
    }
}

impl FromStr for Legend {
    type Err = ScopeError;

    fn from_str(value: &str) -> ScopeResult<Self> {
        value.parse::<LegendLocation>().map(Self::Shown)
    }
}
