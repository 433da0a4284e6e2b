use std::fmt;

/// The searchable agent state at a decision point.
///
/// Position is in tiles relative to the local window. The sensor fields are
/// perception taken before planning; the transition model copies them forward
/// unchanged. `-1` marks a sensor that saw nothing.
///
/// Equality and hashing cover every field, which is what the planner's
/// best-cost table keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KinematicState {
    pub row: i32,
    pub col: i32,
    pub grounded: bool,
    pub can_jump: bool,
    pub wall_distance: i32,
    pub gap_distance: i32,
    pub enemy_distance: i32,
    pub enemy_ahead: bool,
}

impl KinematicState {
    pub const UNSENSED: i32 = -1;

    /// A state with every sensor reading absent.
    pub fn new(row: i32, col: i32, grounded: bool, can_jump: bool) -> Self {
        Self {
            row,
            col,
            grounded,
            can_jump,
            wall_distance: Self::UNSENSED,
            gap_distance: Self::UNSENSED,
            enemy_distance: Self::UNSENSED,
            enemy_ahead: false,
        }
    }

    pub fn with_sensors(
        self,
        wall_distance: i32,
        gap_distance: i32,
        enemy_distance: i32,
        enemy_ahead: bool,
    ) -> Self {
        Self {
            wall_distance,
            gap_distance,
            enemy_distance,
            enemy_ahead,
            ..self
        }
    }

    /// Same sensor readings at a new position.
    pub fn moved_to(self, row: i32, col: i32, grounded: bool, can_jump: bool) -> Self {
        Self {
            row,
            col,
            grounded,
            can_jump,
            ..self
        }
    }
}

impl fmt::Display for KinematicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(r={}, c={}, ground={}, jump={}, wall={}, gap={}, enemy={}{})",
            self.row,
            self.col,
            self.grounded,
            self.can_jump,
            self.wall_distance,
            self.gap_distance,
            self.enemy_distance,
            if self.enemy_ahead { ", ahead" } else { "" }
        )
    }
}
