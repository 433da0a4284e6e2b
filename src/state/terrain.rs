use crate::infra::GridError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Solid,
}

/// Solid/empty classification of the local window around the agent.
///
/// Queries outside the window read as `Solid`. With `with_open_floor(true)`
/// the cells below the bottom edge read as `Empty` instead, which turns gaps
/// that reach the bottom of the window into pits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
    open_floor: bool,
}

impl TerrainGrid {
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            tiles: vec![Tile::Empty; rows * cols],
            open_floor: false,
        }
    }

    /// Build from raw row-major tile codes; any nonzero code is solid.
    pub fn from_codes<R: AsRef<[i32]>>(codes: &[R]) -> Result<Self, GridError> {
        let (rows, cols) = grid_shape(codes)?;
        let tiles = codes
            .iter()
            .flat_map(|row| row.as_ref().iter())
            .map(|&code| if code == 0 { Tile::Empty } else { Tile::Solid })
            .collect();

        Ok(Self {
            rows,
            cols,
            tiles,
            open_floor: false,
        })
    }

    pub fn with_open_floor(mut self, open_floor: bool) -> Self {
        self.open_floor = open_floor;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn has_open_floor(&self) -> bool {
        self.open_floor
    }

    pub fn tile_at(&self, row: i32, col: i32) -> Tile {
        let in_cols = col >= 0 && (col as usize) < self.cols;
        if row < 0 || !in_cols {
            return Tile::Solid;
        }
        if row as usize >= self.rows {
            return if self.open_floor { Tile::Empty } else { Tile::Solid };
        }
        self.tiles[row as usize * self.cols + col as usize]
    }

    pub fn is_solid(&self, row: i32, col: i32) -> bool {
        self.tile_at(row, col) == Tile::Solid
    }

    /// Mark a cell solid. Out-of-window coordinates are ignored.
    pub fn set_solid(&mut self, row: i32, col: i32) {
        if let Some(index) = self.index(row, col) {
            self.tiles[index] = Tile::Solid;
        }
    }

    pub fn clear(&mut self, row: i32, col: i32) {
        if let Some(index) = self.index(row, col) {
            self.tiles[index] = Tile::Empty;
        }
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }
}

/// Shape of a rectangular row-major grid, rejecting empty and ragged input.
pub(crate) fn grid_shape<T, R: AsRef<[T]>>(codes: &[R]) -> Result<(usize, usize), GridError> {
    let rows = codes.len();
    let cols = codes.first().map_or(0, |row| row.as_ref().len());
    if rows == 0 || cols == 0 {
        return Err(GridError::Empty);
    }

    for (row, cells) in codes.iter().enumerate() {
        let found = cells.as_ref().len();
        if found != cols {
            return Err(GridError::Ragged {
                row,
                expected: cols,
                found,
            });
        }
    }

    Ok((rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonzero_codes_are_solid() {
        let terrain = TerrainGrid::from_codes(&[vec![0, 1, 0], vec![2, 0, -1]]).unwrap();

        assert_eq!(terrain.rows(), 2);
        assert_eq!(terrain.cols(), 3);
        assert_eq!(terrain.tile_at(0, 0), Tile::Empty);
        assert_eq!(terrain.tile_at(0, 1), Tile::Solid);
        assert!(terrain.is_solid(1, 0));
        assert!(terrain.is_solid(1, 2));
        assert!(!terrain.is_solid(1, 1));
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let terrain = TerrainGrid::empty(4, 4);

        assert!(terrain.is_solid(-1, 0));
        assert!(terrain.is_solid(0, -1));
        assert!(terrain.is_solid(0, 4));
        assert!(terrain.is_solid(4, 0));
    }

    #[test]
    fn test_open_floor_only_opens_the_bottom_edge() {
        let terrain = TerrainGrid::empty(4, 4).with_open_floor(true);

        assert!(!terrain.is_solid(4, 2));
        assert!(!terrain.is_solid(9, 0));
        assert!(terrain.is_solid(4, 4));
        assert!(terrain.is_solid(-1, 2));
    }

    #[test]
    fn test_rejects_malformed_codes() {
        let empty: [Vec<i32>; 0] = [];
        assert_eq!(TerrainGrid::from_codes(&empty), Err(GridError::Empty));

        let ragged = TerrainGrid::from_codes(&[vec![0, 0], vec![0]]);
        assert_eq!(
            ragged,
            Err(GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_set_solid_ignores_outside_cells() {
        let mut terrain = TerrainGrid::empty(2, 2);
        terrain.set_solid(1, 1);
        terrain.set_solid(5, 5);
        assert!(terrain.is_solid(1, 1));

        terrain.clear(1, 1);
        assert!(!terrain.is_solid(1, 1));
    }
}
