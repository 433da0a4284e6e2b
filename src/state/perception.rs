use crate::state::{HazardGrid, KinematicState, TerrainGrid};

/// Read-only sensor snapshot handed to the planner each frame.
///
/// Engine adapters fill this in from whatever they can read; `sense` derives
/// the distances from the grids for adapters that have nothing better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerceptionSnapshot {
    pub row: i32,
    pub col: i32,
    pub grounded: bool,
    pub can_jump: bool,
    pub wall_distance: i32,
    pub gap_distance: i32,
    pub enemy_distance: i32,
    pub enemy_ahead: bool,
}

impl PerceptionSnapshot {
    /// Columns ahead of the agent scanned by every sensor.
    pub const SENSOR_RANGE: i32 = 8;
    /// Rows checked downward from the body row when looking for a gap.
    pub const GAP_DEPTH: i32 = 5;
    /// Rows above and below the body row scanned for hazards.
    pub const ENEMY_ROW_SPAN: i32 = 2;

    pub fn sense(
        terrain: &TerrainGrid,
        hazards: &HazardGrid,
        row: i32,
        col: i32,
        grounded: bool,
        can_jump: bool,
    ) -> Self {
        let enemy_distance = detect_enemy(hazards, row, col);
        Self {
            row,
            col,
            grounded,
            can_jump,
            wall_distance: detect_wall(terrain, row, col),
            gap_distance: detect_gap(terrain, row, col),
            enemy_distance,
            enemy_ahead: enemy_distance >= 0,
        }
    }

    pub fn to_state(&self) -> KinematicState {
        KinematicState::new(self.row, self.col, self.grounded, self.can_jump).with_sensors(
            self.wall_distance,
            self.gap_distance,
            self.enemy_distance,
            self.enemy_ahead,
        )
    }
}

impl From<PerceptionSnapshot> for KinematicState {
    fn from(snapshot: PerceptionSnapshot) -> Self {
        snapshot.to_state()
    }
}

/// First solid cell on the body row ahead of the agent.
fn detect_wall(terrain: &TerrainGrid, row: i32, col: i32) -> i32 {
    (1..=PerceptionSnapshot::SENSOR_RANGE)
        .find(|dx| terrain.is_solid(row, col + dx))
        .unwrap_or(KinematicState::UNSENSED)
}

/// First column ahead whose cells from the body row down are all empty.
fn detect_gap(terrain: &TerrainGrid, row: i32, col: i32) -> i32 {
    (1..=PerceptionSnapshot::SENSOR_RANGE)
        .find(|dx| {
            (0..PerceptionSnapshot::GAP_DEPTH).all(|dy| !terrain.is_solid(row + dy, col + dx))
        })
        .unwrap_or(KinematicState::UNSENSED)
}

fn detect_enemy(hazards: &HazardGrid, row: i32, col: i32) -> i32 {
    let span = PerceptionSnapshot::ENEMY_ROW_SPAN;
    (1..=PerceptionSnapshot::SENSOR_RANGE)
        .find(|dx| (-span..=span).any(|dy| hazards.has_hazard(row + dy, col + dx)))
        .unwrap_or(KinematicState::UNSENSED)
}
