use thiserror::Error;

/// Rejected physics or planner parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(i32),

    #[error("quantization unit {unit} must be positive and divide the tile size {tile}")]
    InvalidUnit { unit: i32, tile: i32 },

    #[error("jump simulation needs at least one frame")]
    ZeroJumpFrames,

    #[error("fall simulation needs at least one step")]
    ZeroFallSteps,

    #[error("expansion limit must be at least 1")]
    ZeroExpansionLimit,

    #[error("goal must require at least one column of progress")]
    ZeroGoalColumns,

    #[error("{name} must be finite and positive, got {value}")]
    InvalidCost { name: &'static str, value: f32 },

    #[error("heuristic weight {name} must be finite, got {value}")]
    InvalidWeight { name: &'static str, value: f32 },
}

/// Malformed raw tile or hazard grids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("hazard grid is {rows}x{cols} but terrain is {expected_rows}x{expected_cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelParseError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },

    #[error("level has no agent start marker '@'")]
    MissingStart,

    #[error("level has more than one agent start marker")]
    MultipleStarts,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EpisodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),
}
