use tracing::trace;

use crate::infra::{Action, NoopObserver, PlannerObserver};
use crate::planners::astar::PhysicsConfig;
use crate::state::{HazardGrid, KinematicState, TerrainGrid};

/// Transition model: applies one discrete action to a state.
///
/// Motion happens in pixel space, top-left of the agent's body as the
/// reference point, snapped to `unit_pixels`. The body is approximated as the
/// agent's own tile plus the tile above it.
///
/// `simulate` returns `None` when the action cannot be performed: the agent
/// walks or jumps into a wall, or falls without finding ground.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'a> {
    terrain: &'a TerrainGrid,
    physics: PhysicsConfig,
    preserve_can_jump: bool,
}

impl<'a> Simulator<'a> {
    pub fn new(terrain: &'a TerrainGrid, physics: PhysicsConfig) -> Self {
        Self {
            terrain,
            physics,
            preserve_can_jump: false,
        }
    }

    /// Keep the input state's `can_jump` instead of deriving it from contact.
    pub fn preserving_can_jump(mut self) -> Self {
        self.preserve_can_jump = true;
        self
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn simulate(
        &self,
        hazards: &mut HazardGrid,
        state: &KinematicState,
        action: Action,
    ) -> Option<KinematicState> {
        self.simulate_observed(hazards, state, action, &mut NoopObserver)
    }

    pub fn simulate_observed(
        &self,
        hazards: &mut HazardGrid,
        state: &KinematicState,
        action: Action,
        observer: &mut dyn PlannerObserver,
    ) -> Option<KinematicState> {
        let x = self.quantize(state.col * self.physics.tile_size);
        let y = self.quantize(state.row * self.physics.tile_size);
        let walk = self.physics.walk_vx();
        let run = self.physics.run_vx();

        let result = match action {
            Action::WalkRight => self.walk(state, x, y, walk),
            Action::WalkLeft => self.walk(state, x, y, -walk),
            Action::RunRight => self.walk(state, x, y, run),
            Action::Jump => self.jump(hazards, state, x, y, walk, self.physics.jump_vy0(), observer),
            Action::RunJump => {
                self.jump(hazards, state, x, y, run, self.physics.run_jump_vy0(), observer)
            }
            Action::None => self.fall(x, y).map(|landing| self.settle(state, x, landing)),
        };

        observer.on_transition(state, action, result.as_ref());
        result
    }

    /// Whether an agent standing at `(row, col)` has solid ground under it.
    pub fn is_grounded(&self, row: i32, col: i32) -> bool {
        let tile = self.physics.tile_size;
        self.on_ground(col * tile, row * tile)
    }

    fn walk(&self, state: &KinematicState, x: i32, y: i32, vx: i32) -> Option<KinematicState> {
        let next_x = self.quantize(x + vx);
        if self.sweep_collides(x, next_x, y) {
            trace!(from = ?(state.row, state.col), vx = vx, "Walk blocked by wall");
            return None;
        }

        let landing = self.fall(next_x, y)?;
        Some(self.settle(state, next_x, landing))
    }

    #[allow(clippy::too_many_arguments)]
    fn jump(
        &self,
        hazards: &mut HazardGrid,
        state: &KinematicState,
        start_x: i32,
        start_y: i32,
        vx: i32,
        vy0: i32,
        observer: &mut dyn PlannerObserver,
    ) -> Option<KinematicState> {
        let (mut x, mut y, mut vy) = (start_x, start_y, vy0);

        for _ in 0..self.physics.max_jump_frames {
            let next_x = self.quantize(x + vx);
            let next_y = self.quantize(y + vy);

            if vy < 0 && self.sweep_collides(x, next_x, next_y) {
                // Head hit something on the way up; drop straight down from here.
                trace!(at = ?(x, y), "Jump hit ceiling");
                let landing = self.fall(x, y)?;
                return Some(self.settle(state, x, landing));
            }

            let prev_x = x;
            x = next_x;
            y = next_y;

            if self.sweep_collides(prev_x, x, y) {
                trace!(at = ?(x, y), "Jump blocked by wall");
                return None;
            }
            if self.below_window(y) {
                trace!(at = ?(x, y), "Jump fell out of the window");
                return None;
            }

            if vy > 0 {
                if let Some((row, col)) = self.stomp(hazards, prev_x, x, y) {
                    observer.on_hazard_defeated(row, col);
                    let tile = self.physics.tile_size;
                    return Some(self.settle(state, col * tile, row * tile));
                }
            }

            if vy >= 0 && self.on_ground(x, y) {
                return Some(self.settle(state, x, self.align_to_ground(y)));
            }

            vy += self.physics.gravity();
        }

        let landing = self.fall(x, y)?;
        Some(self.settle(state, x, landing))
    }

    /// Checks every column crossed this frame, in travel order, for a hazard
    /// in the row holding the agent's feet. The first one found is removed.
    fn stomp(
        &self,
        hazards: &mut HazardGrid,
        prev_x: i32,
        x: i32,
        y: i32,
    ) -> Option<(i32, i32)> {
        let tile = self.physics.tile_size;
        let feet_row = (y + tile - 1).div_euclid(tile);
        let from = prev_x.div_euclid(tile);
        let to = x.div_euclid(tile);

        let step = if to >= from { 1 } else { -1 };

        let mut col = from;
        loop {
            if hazards.remove(feet_row, col) {
                return Some((feet_row, col));
            }
            if col == to {
                return None;
            }
            col += step;
        }
    }

    /// Drops straight down one unit at a time until standing on ground.
    /// Returns the landing y aligned to the top of the supporting tile.
    fn fall(&self, x: i32, start_y: i32) -> Option<i32> {
        let mut y = start_y;
        for _ in 0..self.physics.max_fall_steps {
            if self.on_ground(x, y) {
                return Some(self.align_to_ground(y));
            }

            let next_y = y + self.physics.unit_pixels;
            if self.below_window(next_y) || self.collides(x, next_y) {
                trace!(at = ?(x, next_y), "Fell into a gap");
                return None;
            }
            y = next_y;
        }

        trace!(at = ?(x, y), "Fall step bound exceeded");
        None
    }

    fn settle(&self, base: &KinematicState, x: i32, y: i32) -> KinematicState {
        let tile = self.physics.tile_size;
        let grounded = self.on_ground(x, y);
        let can_jump = if self.preserve_can_jump {
            base.can_jump
        } else {
            grounded
        };
        base.moved_to(y.div_euclid(tile), x.div_euclid(tile), grounded, can_jump)
    }

    fn on_ground(&self, x: i32, y: i32) -> bool {
        let tile = self.physics.tile_size;
        self.terrain
            .is_solid((y + tile).div_euclid(tile), x.div_euclid(tile))
    }

    fn align_to_ground(&self, y: i32) -> i32 {
        let tile = self.physics.tile_size;
        (y + tile).div_euclid(tile) * tile - tile
    }

    fn collides(&self, x: i32, y: i32) -> bool {
        let tile = self.physics.tile_size;
        let col = x.div_euclid(tile);
        let row = y.div_euclid(tile);
        self.terrain.is_solid(row, col) || self.terrain.is_solid(row - 1, col)
    }

    /// Collision over every column entered when moving from `from_x` to
    /// `to_x` at height `y`. A horizontal step can be wider than a tile, so
    /// checking only the destination could skip a wall.
    fn sweep_collides(&self, from_x: i32, to_x: i32, y: i32) -> bool {
        let tile = self.physics.tile_size;
        let from = from_x.div_euclid(tile);
        let to = to_x.div_euclid(tile);
        if from == to {
            return self.collides(to_x, y);
        }

        let step = if to > from { 1 } else { -1 };
        let mut col = from;
        while col != to {
            col += step;
            if self.collides(col * tile, y) {
                return true;
            }
        }
        false
    }

    fn below_window(&self, y: i32) -> bool {
        y.div_euclid(self.physics.tile_size) >= self.terrain.rows() as i32
    }

    fn quantize(&self, px: i32) -> i32 {
        let unit = self.physics.unit_pixels;
        if unit <= 1 {
            return px;
        }
        px.div_euclid(unit) * unit
    }
}
