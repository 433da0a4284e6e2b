use crate::infra::GridError;
use crate::state::TerrainGrid;
use crate::state::terrain::grid_shape;

/// Enemy occupancy over the same window as the terrain.
///
/// A planner owns one of these for the duration of a call and mutates it in
/// place when a simulated trajectory defeats a hazard, so every branch
/// expanded afterwards sees the hazard gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl HazardGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Build from raw row-major occupancy codes; any nonzero code is a hazard.
    pub fn from_codes<R: AsRef<[i32]>>(codes: &[R]) -> Result<Self, GridError> {
        let (rows, cols) = grid_shape(codes)?;
        let cells = codes
            .iter()
            .flat_map(|row| row.as_ref().iter())
            .map(|&code| code != 0)
            .collect();
        Ok(Self { rows, cols, cells })
    }

    /// A hazard-free grid shaped like `terrain`.
    pub fn matching(terrain: &TerrainGrid) -> Self {
        Self::new(terrain.rows(), terrain.cols())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn has_hazard(&self, row: i32, col: i32) -> bool {
        self.index(row, col).is_some_and(|index| self.cells[index])
    }

    /// Returns whether a hazard was present and has been removed.
    pub fn remove(&mut self, row: i32, col: i32) -> bool {
        match self.index(row, col) {
            Some(index) if self.cells[index] => {
                self.cells[index] = false;
                true
            }
            _ => false,
        }
    }

    /// Returns whether the cell was inside the grid and previously empty.
    pub fn insert(&mut self, row: i32, col: i32) -> bool {
        match self.index(row, col) {
            Some(index) if !self.cells[index] => {
                self.cells[index] = true;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Positions of all hazards as `(row, col)`, row-major.
    pub fn positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell)
            .map(|(index, _)| ((index / self.cols) as i32, (index % self.cols) as i32))
    }

    pub fn ensure_matches(&self, terrain: &TerrainGrid) -> Result<(), GridError> {
        if self.rows != terrain.rows() || self.cols != terrain.cols() {
            return Err(GridError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                expected_rows: terrain.rows(),
                expected_cols: terrain.cols(),
            });
        }
        Ok(())
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }
}
