use serde::{Deserialize, Serialize};

use crate::core::AxisRange;
use crate::plot::{AxesGrid, LegendLocation, LineHandle, LineId};

use super::{EngineMode, EngineState, PlotSession};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub id: LineId,
    pub label: String,
    pub x_index: Option<usize>,
    pub y_index: usize,
    pub len: usize,
    /// Last displayed sample, `None` for an empty line.
    pub last: Option<(f64, f64)>,
}

impl From<&LineHandle> for LineSnapshot {
    fn from(line: &LineHandle) -> Self {
        let origin = line.origin();
        Self {
            id: line.id(),
            label: line.label().to_owned(),
            x_index: origin.x_index,
            y_index: origin.y_index,
            len: line.len(),
            last: line.x().last().copied().zip(line.y().last().copied()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub row: usize,
    pub col: usize,
    pub x_limits: AxisRange,
    pub y_limits: AxisRange,
    pub x_tick_labels: bool,
    pub y_tick_labels: bool,
    pub legend: Option<LegendLocation>,
    pub lines: Vec<LineSnapshot>,
}

/// Point-in-time view of the engine, suitable for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub mode: EngineMode,
    pub tick_count: u64,
    pub redraw_count: u64,
    pub table_rows: usize,
    pub window_size: Option<usize>,
    pub autoscale_x: bool,
    pub autoscale_y: bool,
    pub shape: Option<(usize, usize)>,
    pub cells: Vec<CellSnapshot>,
}

impl EngineSnapshot {
    pub(crate) fn cells_of(grid: &AxesGrid) -> Vec<CellSnapshot> {
        grid.cells()
            .iter()
            .enumerate()
            .map(|(index, cell)| CellSnapshot {
                row: cell.row(),
                col: cell.col(),
                x_limits: grid.x_limits(index),
                y_limits: grid.y_limits(index),
                x_tick_labels: cell.x_tick_labels_visible(),
                y_tick_labels: cell.y_tick_labels_visible(),
                legend: cell.legend(),
                lines: cell.lines().iter().map(LineSnapshot::from).collect(),
            })
            .collect()
    }

    pub(crate) fn session_fields(session: Option<&PlotSession>) -> (Option<usize>, bool, bool) {
        session.map_or((None, false, false), |session| {
            (
                session.window_size(),
                session.autoscale_x(),
                session.autoscale_y(),
            )
        })
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.lines.len()).sum()
    }
}
