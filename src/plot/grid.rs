use smallvec::SmallVec;

use crate::core::AxisRange;
use crate::error::{ScopeError, ScopeResult};

use super::{LegendLocation, LineHandle, LineOrigin, ShareMode};

/// One axes cell of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesCell {
    row: usize,
    col: usize,
    x_leader: usize,
    y_leader: usize,
    x_tick_labels: bool,
    y_tick_labels: bool,
    x_limits: AxisRange,
    y_limits: AxisRange,
    lines: SmallVec<[LineHandle; 2]>,
    legend: Option<LegendLocation>,
}

impl AxesCell {
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub fn col(&self) -> usize {
        self.col
    }

    #[must_use]
    pub fn x_tick_labels_visible(&self) -> bool {
        self.x_tick_labels
    }

    #[must_use]
    pub fn y_tick_labels_visible(&self) -> bool {
        self.y_tick_labels
    }

    #[must_use]
    pub fn lines(&self) -> &[LineHandle] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [LineHandle] {
        &mut self.lines
    }

    pub(crate) fn push_line(&mut self, line: LineHandle) {
        self.lines.push(line);
    }

    #[must_use]
    pub fn legend(&self) -> Option<LegendLocation> {
        self.legend
    }

    pub fn set_legend(&mut self, legend: Option<LegendLocation>) {
        self.legend = legend;
    }

    /// Union of the tight bounds of every line in this cell.
    #[must_use]
    pub fn data_bounds(&self) -> (Option<AxisRange>, Option<AxisRange>) {
        let mut x_bounds: Option<AxisRange> = None;
        let mut y_bounds: Option<AxisRange> = None;
        for line in &self.lines {
            let (x, y) = line.bounds();
            x_bounds = merge(x_bounds, x);
            y_bounds = merge(y_bounds, y);
        }
        (x_bounds, y_bounds)
    }
}

pub(crate) fn merge(a: Option<AxisRange>, b: Option<AxisRange>) -> Option<AxisRange> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Row-major grid of axes cells with fixed shape.
///
/// Shared axes keep their limits on the group leader; every accessor
/// resolves through it so the whole group always reports one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesGrid {
    rows: usize,
    cols: usize,
    share_x: ShareMode,
    share_y: ShareMode,
    cells: Vec<AxesCell>,
}

impl AxesGrid {
    pub fn new(rows: usize, cols: usize, share_x: ShareMode, share_y: ShareMode) -> ScopeResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(ScopeError::Configuration(format!(
                "axes grid must have at least one cell, got {rows}x{cols}"
            )));
        }

        let x_leaders = share_x.leaders(rows, cols);
        let y_leaders = share_y.leaders(rows, cols);
        let hide_inner_x = matches!(share_x, ShareMode::Col | ShareMode::All) && rows > 1;
        let hide_inner_y = matches!(share_y, ShareMode::Row | ShareMode::All) && cols > 1;

        let cells = (0..rows * cols)
            .map(|index| {
                let row = index / cols;
                let col = index % cols;
                AxesCell {
                    row,
                    col,
                    x_leader: x_leaders[index],
                    y_leader: y_leaders[index],
                    x_tick_labels: !(hide_inner_x && row + 1 < rows),
                    y_tick_labels: !(hide_inner_y && col > 0),
                    x_limits: AxisRange::default(),
                    y_limits: AxisRange::default(),
                    lines: SmallVec::new(),
                    legend: None,
                }
            })
            .collect();

        Ok(Self {
            rows,
            cols,
            share_x,
            share_y,
            cells,
        })
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub fn share_modes(&self) -> (ShareMode, ShareMode) {
        (self.share_x, self.share_y)
    }

    #[must_use]
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&AxesCell> {
        self.index(row, col).map(|index| &self.cells[index])
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut AxesCell> {
        self.index(row, col).map(|index| &mut self.cells[index])
    }

    #[must_use]
    pub fn cells(&self) -> &[AxesCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [AxesCell] {
        &mut self.cells
    }

    #[must_use]
    pub fn x_limits(&self, index: usize) -> AxisRange {
        self.cells[self.cells[index].x_leader].x_limits
    }

    #[must_use]
    pub fn y_limits(&self, index: usize) -> AxisRange {
        self.cells[self.cells[index].y_leader].y_limits
    }

    pub fn set_x_limits(&mut self, index: usize, limits: AxisRange) {
        let leader = self.cells[index].x_leader;
        self.cells[leader].x_limits = limits;
    }

    pub fn set_y_limits(&mut self, index: usize, limits: AxisRange) {
        let leader = self.cells[index].y_leader;
        self.cells[leader].y_limits = limits;
    }

    /// Cells sharing the x scale of `index`, leader included.
    #[must_use]
    pub fn x_group(&self, index: usize) -> Vec<usize> {
        let leader = self.cells[index].x_leader;
        (0..self.cells.len())
            .filter(|&other| self.cells[other].x_leader == leader)
            .collect()
    }

    /// Cells sharing the y scale of `index`, leader included.
    #[must_use]
    pub fn y_group(&self, index: usize) -> Vec<usize> {
        let leader = self.cells[index].y_leader;
        (0..self.cells.len())
            .filter(|&other| self.cells[other].y_leader == leader)
            .collect()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.lines.len()).sum()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineHandle> {
        self.cells.iter().flat_map(|cell| cell.lines.iter())
    }

    #[must_use]
    pub fn find_line(&self, origin: LineOrigin) -> Option<&LineHandle> {
        self.lines().find(|line| line.origin() == origin)
    }

    pub fn find_line_mut(&mut self, origin: LineOrigin) -> Option<&mut LineHandle> {
        self.cells
            .iter_mut()
            .flat_map(|cell| cell.lines.iter_mut())
            .find(|line| line.origin() == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_columns_hide_inner_x_labels() {
        let grid = AxesGrid::new(3, 2, ShareMode::Col, ShareMode::None).expect("grid");
        for cell in grid.cells() {
            assert_eq!(cell.x_tick_labels_visible(), cell.row() == 2);
            assert!(cell.y_tick_labels_visible());
        }
    }

    #[test]
    fn shared_rows_hide_inner_y_labels() {
        let grid = AxesGrid::new(2, 3, ShareMode::None, ShareMode::Row).expect("grid");
        for cell in grid.cells() {
            assert_eq!(cell.y_tick_labels_visible(), cell.col() == 0);
        }
    }

    #[test]
    fn shared_limits_resolve_through_leader() {
        let mut grid = AxesGrid::new(2, 2, ShareMode::Col, ShareMode::All).expect("grid");
        grid.set_x_limits(3, AxisRange::new(-5.0, 5.0));
        assert_eq!(grid.x_limits(1), AxisRange::new(-5.0, 5.0));
        assert_eq!(grid.x_limits(0), AxisRange::default());
        assert_eq!(grid.x_group(3), vec![1, 3]);

        grid.set_y_limits(2, AxisRange::new(0.0, 8.0));
        assert!(
            (0..4).all(|index| grid.y_limits(index) == AxisRange::new(0.0, 8.0))
        );
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(AxesGrid::new(0, 1, ShareMode::None, ShareMode::None).is_err());
    }
}
