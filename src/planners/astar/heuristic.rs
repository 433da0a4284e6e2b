use crate::planners::astar::HeuristicWeights;
use crate::state::KinematicState;

/// Estimated remaining cost of a state; lower is more promising.
///
/// The sensor terms read the perception carried on the state, which is the
/// snapshot taken before planning rather than one re-derived per position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heuristic {
    weights: HeuristicWeights,
}

impl Heuristic {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    pub fn evaluate(&self, state: &KinematicState) -> f32 {
        let w = &self.weights;
        let mut h = -(state.col as f32) * w.forward;

        h += proximity(state.wall_distance, w.wall_range, w.wall);
        h += proximity(state.gap_distance, w.gap_range, w.gap);
        h += proximity(state.enemy_distance, w.enemy_range, w.enemy);

        h
    }
}

fn proximity(distance: i32, range: i32, weight: f32) -> f32 {
    if distance < 0 {
        return 0.0;
    }
    (range - distance) as f32 * weight
}
