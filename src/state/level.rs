use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::infra::{GridError, LevelParseError};
use crate::state::{HazardGrid, TerrainGrid};

/// A terrain window, its hazards, and where the agent starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub terrain: TerrainGrid,
    pub hazards: HazardGrid,
    pub start_row: i32,
    pub start_col: i32,
}

impl Level {
    /// Parse an ASCII level.
    ///
    /// `#` solid, `E` hazard, `@` agent start, `.` or space empty. Every line
    /// must have the same width; trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, LevelParseError> {
        let lines: Vec<&str> = text.trim_end_matches(['\n', '\r']).lines().collect();

        let mut solid: Vec<Vec<i32>> = Vec::with_capacity(lines.len());
        let mut enemies: Vec<Vec<i32>> = Vec::with_capacity(lines.len());
        let mut start = None;

        for (row, line) in lines.iter().enumerate() {
            let mut solid_row = Vec::with_capacity(line.len());
            let mut enemy_row = Vec::with_capacity(line.len());
            for (col, ch) in line.trim_end_matches('\r').chars().enumerate() {
                let (tile, enemy) = match ch {
                    '#' => (1, 0),
                    'E' => (0, 1),
                    '.' | ' ' => (0, 0),
                    '@' => {
                        if start.replace((row as i32, col as i32)).is_some() {
                            return Err(LevelParseError::MultipleStarts);
                        }
                        (0, 0)
                    }
                    _ => return Err(LevelParseError::UnknownTile { ch, row, col }),
                };
                solid_row.push(tile);
                enemy_row.push(enemy);
            }
            solid.push(solid_row);
            enemies.push(enemy_row);
        }

        let terrain = TerrainGrid::from_codes(&solid)?;
        let hazards = HazardGrid::from_codes(&enemies)?;
        let (start_row, start_col) = start.ok_or(LevelParseError::MissingStart)?;

        Ok(Self {
            terrain,
            hazards,
            start_row,
            start_col,
        })
    }

    /// A random side-scrolling strip: a two-row floor with gaps, short
    /// pillars, and hazards standing on the floor. The first columns are
    /// always flat so the agent starts on solid ground.
    pub fn generate(seed: u64, rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows < 4 || cols == 0 {
            return Err(GridError::Empty);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut terrain = TerrainGrid::empty(rows, cols).with_open_floor(true);
        let mut hazards = HazardGrid::new(rows, cols);
        let floor = rows as i32 - 2;
        let safe_cols = 4;

        let mut col = 0;
        while col < cols as i32 {
            if col >= safe_cols && rng.random_bool(0.08) {
                // gap: leave the floor out
                col += rng.random_range(1..=2);
                continue;
            }

            terrain.set_solid(floor, col);
            terrain.set_solid(floor + 1, col);

            if col >= safe_cols && rng.random_bool(0.1) {
                let height = rng.random_range(1..=3);
                for dy in 1..=height {
                    terrain.set_solid(floor - dy, col);
                }
            } else if col >= safe_cols && rng.random_bool(0.05) {
                hazards.insert(floor - 1, col);
            }
            col += 1;
        }

        Ok(Self {
            terrain,
            hazards,
            start_row: floor - 1,
            start_col: 1,
        })
    }

    pub fn with_open_floor(mut self, open_floor: bool) -> Self {
        self.terrain = self.terrain.with_open_floor(open_floor);
        self
    }
}
