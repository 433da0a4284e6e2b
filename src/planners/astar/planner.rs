use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace, warn};

use crate::infra::{Action, NoopObserver, PlannerObserver};
use crate::planners::astar::node::OpenEntry;
use crate::planners::astar::{Heuristic, PhysicsConfig, PlannerConfig, SearchNode, Simulator};
use crate::state::{HazardGrid, KinematicState, TerrainGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerPhase {
    Initialized,
    Expanding,
    GoalFound,
    Exhausted,
    NodeLimitHit,
}

/// How a planning call ended. Only `GoalFound` yields an action other than
/// `Action::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    GoalFound,
    Exhausted,
    NodeLimitHit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanReport {
    pub action: Action,
    pub outcome: PlanOutcome,
    /// Nodes actually expanded (stale and over-cost pops are not counted)
    pub expansions: usize,
    pub nodes_created: usize,
    pub goal: Option<KinematicState>,
    /// Number of actions on the path to the goal
    pub path_len: usize,
}

/// Bounded best-first search for the next action.
///
/// Each planning call works on its own copy of the hazard grid the planner
/// was built with. Within a call, hazards defeated while simulating one
/// branch stay defeated for every branch expanded later.
pub struct Planner<'a> {
    simulator: Simulator<'a>,
    initial_hazards: HazardGrid,
    hazards: HazardGrid,
    heuristic: Heuristic,
    config: PlannerConfig,
    phase: PlannerPhase,
    observer: Box<dyn PlannerObserver>,
}

impl<'a> Planner<'a> {
    pub fn new(terrain: &'a TerrainGrid, hazards: HazardGrid) -> Self {
        Self::with_config(
            terrain,
            hazards,
            PlannerConfig::default(),
            PhysicsConfig::default(),
        )
    }

    /// Configs are expected to have passed `validate()`.
    pub fn with_config(
        terrain: &'a TerrainGrid,
        hazards: HazardGrid,
        config: PlannerConfig,
        physics: PhysicsConfig,
    ) -> Self {
        Self {
            simulator: Simulator::new(terrain, physics),
            initial_hazards: hazards.clone(),
            hazards,
            heuristic: Heuristic::new(config.weights),
            config,
            phase: PlannerPhase::Initialized,
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn PlannerObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn phase(&self) -> PlannerPhase {
        self.phase
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Hazards as left by the most recent planning call.
    pub fn hazards(&self) -> &HazardGrid {
        &self.hazards
    }

    pub fn into_hazards(self) -> HazardGrid {
        self.hazards
    }

    /// The next action to take from `start`; `Action::None` when no plan was found.
    pub fn plan(&mut self, start: &KinematicState) -> Action {
        self.plan_detailed(start).action
    }

    #[tracing::instrument(level = "debug", skip(self, start), fields(row = start.row, col = start.col))]
    pub fn plan_detailed(&mut self, start: &KinematicState) -> PlanReport {
        self.phase = PlannerPhase::Initialized;
        self.hazards.clone_from(&self.initial_hazards);
        self.observer.on_plan_start(start);

        let mut nodes: Vec<SearchNode> = Vec::new();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut best_g: HashMap<KinematicState, f32> = HashMap::new();
        let mut seq: u64 = 0;
        let mut expansions = 0;

        let root = SearchNode::root(*start, self.heuristic.evaluate(start));
        open.push(OpenEntry {
            f: root.f,
            seq,
            index: 0,
        });
        seq += 1;
        nodes.push(root);
        best_g.insert(*start, 0.0);

        self.phase = PlannerPhase::Expanding;
        let min_col = start.col - self.config.backward_limit;

        while let Some(entry) = open.pop() {
            let current = nodes[entry.index].clone();

            if current.g > self.config.max_path_cost {
                trace!(node = entry.index, g = current.g, "Skipping node over path cost bound");
                continue;
            }
            if best_g
                .get(&current.state)
                .is_some_and(|&best| best < current.g)
            {
                trace!(node = entry.index, g = current.g, "Skipping stale node");
                continue;
            }

            if self.is_goal(start, &current.state) {
                self.phase = PlannerPhase::GoalFound;
                let (action, path_len) = first_action(&nodes, entry.index);
                let report = PlanReport {
                    action,
                    outcome: PlanOutcome::GoalFound,
                    expansions,
                    nodes_created: nodes.len(),
                    goal: Some(current.state),
                    path_len,
                };
                debug!(
                    action = %action,
                    goal = ?(current.state.row, current.state.col),
                    path_len = path_len,
                    expansions = expansions,
                    "Goal found"
                );
                return self.finish(report);
            }

            expansions += 1;
            if expansions > self.config.max_expansions {
                self.phase = PlannerPhase::NodeLimitHit;
                warn!(
                    limit = self.config.max_expansions,
                    nodes = nodes.len(),
                    "Expansion limit hit, holding position"
                );
                let report = PlanReport {
                    action: Action::None,
                    outcome: PlanOutcome::NodeLimitHit,
                    expansions: self.config.max_expansions,
                    nodes_created: nodes.len(),
                    goal: None,
                    path_len: 0,
                };
                return self.finish(report);
            }

            self.observer
                .on_node_expanded(entry.index, &current.state, current.g, current.f);

            for action in candidate_actions(&current.state) {
                let Some(next) = self.simulator.simulate_observed(
                    &mut self.hazards,
                    &current.state,
                    action,
                    self.observer.as_mut(),
                ) else {
                    continue;
                };

                if next.col < min_col {
                    trace!(action = %action, col = next.col, "Pruned past backward limit");
                    continue;
                }

                let g = current.g + self.action_cost(action);
                if best_g.get(&next).is_some_and(|&best| best <= g) {
                    continue;
                }
                best_g.insert(next, g);

                let index = nodes.len();
                let child = SearchNode::child(next, entry.index, action, g, self.heuristic.evaluate(&next));
                open.push(OpenEntry {
                    f: child.f,
                    seq,
                    index,
                });
                seq += 1;
                nodes.push(child);
            }
        }

        self.phase = PlannerPhase::Exhausted;
        debug!(expansions = expansions, nodes = nodes.len(), "Open set exhausted");
        let report = PlanReport {
            action: Action::None,
            outcome: PlanOutcome::Exhausted,
            expansions,
            nodes_created: nodes.len(),
            goal: None,
            path_len: 0,
        };
        self.finish(report)
    }

    fn finish(&mut self, report: PlanReport) -> PlanReport {
        self.observer.on_plan_finished(&report);
        report
    }

    fn is_goal(&self, start: &KinematicState, state: &KinematicState) -> bool {
        state.grounded && state.col - start.col >= self.config.goal_columns
    }

    fn action_cost(&self, action: Action) -> f32 {
        match action {
            Action::WalkLeft | Action::None => self.config.fallback_cost,
            _ => self.config.forward_cost,
        }
    }
}

/// Actions tried from a state, most promising first.
fn candidate_actions(state: &KinematicState) -> Vec<Action> {
    let mut actions = Vec::with_capacity(6);
    if state.grounded {
        actions.push(Action::RunRight);
    }
    actions.push(Action::WalkRight);
    if state.can_jump {
        actions.push(Action::Jump);
        actions.push(Action::RunJump);
    }
    actions.push(Action::None);
    actions.push(Action::WalkLeft);
    actions
}

/// Walks parents back to the root and returns the action of the root's
/// child on that path, plus the path length.
fn first_action(nodes: &[SearchNode], goal: usize) -> (Action, usize) {
    let mut current = goal;
    let mut path_len = 0;
    while let Some(parent) = nodes[current].parent {
        path_len += 1;
        if nodes[parent].is_root() {
            return (nodes[current].action, path_len);
        }
        current = parent;
    }
    (Action::None, path_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{PlanEvent, RecordingObserver};

    fn flat_ground(rows: usize, cols: usize) -> TerrainGrid {
        let mut terrain = TerrainGrid::empty(rows, cols);
        for col in 0..cols as i32 {
            terrain.set_solid(rows as i32 - 1, col);
        }
        terrain
    }

    #[test]
    fn test_candidate_order() {
        let grounded = KinematicState::new(5, 5, true, true);
        assert_eq!(
            candidate_actions(&grounded),
            vec![
                Action::RunRight,
                Action::WalkRight,
                Action::Jump,
                Action::RunJump,
                Action::None,
                Action::WalkLeft
            ]
        );

        let airborne = KinematicState::new(5, 5, false, false);
        assert_eq!(
            candidate_actions(&airborne),
            vec![Action::WalkRight, Action::None, Action::WalkLeft]
        );
    }

    #[test]
    fn test_first_action_walks_to_root() {
        let s = |col| KinematicState::new(5, col, true, true);
        let nodes = vec![
            SearchNode::root(s(0), 0.0),
            SearchNode::child(s(1), 0, Action::WalkRight, 1.0, 0.0),
            SearchNode::child(s(12), 1, Action::Jump, 2.0, 0.0),
            SearchNode::child(s(13), 2, Action::RunRight, 3.0, 0.0),
        ];
        assert_eq!(first_action(&nodes, 3), (Action::WalkRight, 3));
        assert_eq!(first_action(&nodes, 1), (Action::WalkRight, 1));
        assert_eq!(first_action(&nodes, 0), (Action::None, 0));
    }

    #[test]
    fn test_open_corridor_prefers_run_jump() {
        let terrain = flat_ground(20, 60);
        let mut planner = Planner::new(&terrain, HazardGrid::matching(&terrain));

        let start = KinematicState::new(18, 2, true, true);
        let report = planner.plan_detailed(&start);

        assert_eq!(report.outcome, PlanOutcome::GoalFound);
        assert_eq!(report.action, Action::RunJump);
        assert_eq!(report.expansions, 1);
        assert_eq!(report.path_len, 1);
        assert_eq!(planner.phase(), PlannerPhase::GoalFound);
    }

    #[test]
    fn test_walled_in_agent_exhausts() {
        let mut terrain = flat_ground(20, 40);
        for row in 0..20 {
            terrain.set_solid(row, 8);
        }
        let mut planner = Planner::new(&terrain, HazardGrid::matching(&terrain));

        let start = KinematicState::new(18, 5, true, true);
        let report = planner.plan_detailed(&start);

        assert_eq!(report.outcome, PlanOutcome::Exhausted);
        assert_eq!(report.action, Action::None);
        assert_eq!(planner.phase(), PlannerPhase::Exhausted);
    }

    #[test]
    fn test_expansion_limit_returns_none() {
        let mut terrain = flat_ground(20, 40);
        for row in 0..20 {
            terrain.set_solid(row, 8);
        }
        let config = PlannerConfig {
            max_expansions: 2,
            ..PlannerConfig::default()
        };
        let mut planner = Planner::with_config(
            &terrain,
            HazardGrid::matching(&terrain),
            config,
            PhysicsConfig::default(),
        );

        let start = KinematicState::new(18, 5, true, true);
        let report = planner.plan_detailed(&start);

        assert_eq!(report.outcome, PlanOutcome::NodeLimitHit);
        assert_eq!(report.action, Action::None);
        assert_eq!(report.expansions, 2);
        assert_eq!(planner.phase(), PlannerPhase::NodeLimitHit);
    }

    #[test]
    fn test_hazard_defeat_is_shared_across_branches() {
        let terrain = flat_ground(20, 60);
        let mut hazards = HazardGrid::matching(&terrain);
        hazards.insert(18, 15);
        let recorder = RecordingObserver::new();
        let mut planner =
            Planner::new(&terrain, hazards).with_observer(Box::new(recorder.clone()));

        let start = KinematicState::new(18, 5, true, true);
        planner.plan(&start);

        assert!(!planner.hazards().has_hazard(18, 15));
        let defeats = recorder
            .events()
            .into_iter()
            .filter(|event| matches!(event, PlanEvent::HazardDefeated { .. }))
            .count();
        assert_eq!(defeats, 1);
    }

    #[test]
    fn test_each_call_starts_from_the_original_hazards() {
        let terrain = flat_ground(20, 60);
        let mut hazards = HazardGrid::matching(&terrain);
        hazards.insert(18, 15);
        let recorder = RecordingObserver::new();
        let mut planner =
            Planner::new(&terrain, hazards).with_observer(Box::new(recorder.clone()));

        let start = KinematicState::new(18, 5, true, true);
        let first = planner.plan_detailed(&start);
        assert!(!planner.hazards().has_hazard(18, 15));

        recorder.clear();
        let second = planner.plan_detailed(&start);
        assert_eq!(first, second);
        assert!(
            recorder
                .events()
                .iter()
                .any(|event| matches!(event, PlanEvent::HazardDefeated { row: 18, col: 15 }))
        );
    }

    #[test]
    fn test_nodes_over_path_cost_are_not_expanded() {
        let terrain = flat_ground(20, 60);
        let config = PlannerConfig {
            max_path_cost: 0.5,
            ..PlannerConfig::default()
        };
        let recorder = RecordingObserver::new();
        let mut planner = Planner::with_config(
            &terrain,
            HazardGrid::matching(&terrain),
            config,
            PhysicsConfig::default(),
        )
        .with_observer(Box::new(recorder.clone()));

        let start = KinematicState::new(18, 2, true, true);
        let report = planner.plan_detailed(&start);

        assert_eq!(report.outcome, PlanOutcome::Exhausted);
        assert_eq!(report.action, Action::None);
        assert_eq!(report.expansions, 1);
        assert!(report.nodes_created > 1);
        assert_eq!(recorder.expanded_states(), vec![start]);
    }

    #[test]
    fn test_stale_copy_is_not_expanded() {
        // Twelve columns with the right edge as a wall. Walking left from the
        // run-jump landing at col 11 reaches col 7 with g = 6 first; the
        // later RunRight from col 6 reaches it with g = 2.
        let terrain = flat_ground(20, 12);
        let config = PlannerConfig {
            goal_columns: 100,
            ..PlannerConfig::default()
        };
        let recorder = RecordingObserver::new();
        let mut planner = Planner::with_config(
            &terrain,
            HazardGrid::matching(&terrain),
            config,
            PhysicsConfig::default(),
        )
        .with_observer(Box::new(recorder.clone()));

        let start = KinematicState::new(18, 5, true, true);
        let report = planner.plan_detailed(&start);
        assert_eq!(report.outcome, PlanOutcome::Exhausted);

        let target = KinematicState::new(18, 7, true, true);
        let expanded: Vec<f32> = recorder
            .events()
            .into_iter()
            .filter_map(|event| match event {
                PlanEvent::Expanded { state, g, .. } if state == target => Some(g),
                _ => None,
            })
            .collect();
        assert_eq!(expanded, vec![2.0]);

        let reached_expensively = recorder.events().into_iter().any(|event| {
            matches!(
                event,
                PlanEvent::Transition { from, action: Action::WalkLeft, to: Some(to) }
                    if from.col == 8 && to == target
            )
        });
        assert!(reached_expensively);
    }

    #[test]
    fn test_observer_sees_finish() {
        let terrain = flat_ground(20, 60);
        let recorder = RecordingObserver::new();
        let mut planner = Planner::new(&terrain, HazardGrid::matching(&terrain))
            .with_observer(Box::new(recorder.clone()));

        let start = KinematicState::new(18, 2, true, true);
        let action = planner.plan(&start);

        let report = recorder.report().unwrap();
        assert_eq!(report.action, action);
        assert_eq!(report.outcome, PlanOutcome::GoalFound);
        assert_eq!(recorder.expanded_states(), vec![start]);
    }
}
