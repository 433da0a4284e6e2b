use tracing::{debug, info, warn};

use crate::infra::{Action, EpisodeError, PlannerObserver};
use crate::planners::astar::{PhysicsConfig, PlanOutcome, Planner, PlannerConfig, Simulator};
use crate::state::{HazardGrid, KinematicState, Level, PerceptionSnapshot, TerrainGrid};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeConfig {
    pub frames: usize,
    pub planner: PlannerConfig,
    pub physics: PhysicsConfig,
    /// Jump when the planner gives up while standing right before a gap
    pub survival_jump: bool,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            frames: 60,
            planner: PlannerConfig::default(),
            physics: PhysicsConfig::default(),
            survival_jump: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Running,
    /// The frame budget ran out with the agent still alive
    Finished,
    /// The chosen action could not be carried out (fell, or walked into a wall)
    Lost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub frame: usize,
    pub state: KinematicState,
    pub action: Action,
    pub outcome: PlanOutcome,
    pub survival_jump: bool,
    pub next: Option<KinematicState>,
}

/// Drives the agent through a level one frame at a time.
///
/// Each frame derives perception, hands a fresh planner a copy of the
/// hazards, and applies the returned action to the authoritative grids with
/// the same transition model. Nothing from the search carries over.
pub struct Episode {
    terrain: TerrainGrid,
    hazards: HazardGrid,
    agent: KinematicState,
    config: EpisodeConfig,
    frame: usize,
    status: EpisodeStatus,
    observer_factory: Option<Box<dyn Fn() -> Box<dyn PlannerObserver>>>,
}

impl Episode {
    pub fn new(
        terrain: TerrainGrid,
        hazards: HazardGrid,
        start_row: i32,
        start_col: i32,
        config: EpisodeConfig,
    ) -> Result<Self, EpisodeError> {
        config.physics.validate()?;
        config.planner.validate()?;
        hazards.ensure_matches(&terrain)?;

        let grounded = Simulator::new(&terrain, config.physics).is_grounded(start_row, start_col);
        let agent = KinematicState::new(start_row, start_col, grounded, grounded);

        Ok(Self {
            terrain,
            hazards,
            agent,
            config,
            frame: 0,
            status: EpisodeStatus::Running,
            observer_factory: None,
        })
    }

    pub fn from_level(level: Level, config: EpisodeConfig) -> Result<Self, EpisodeError> {
        Self::new(
            level.terrain,
            level.hazards,
            level.start_row,
            level.start_col,
            config,
        )
    }

    /// Attach an observer to every per-frame planner.
    pub fn with_observer<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn PlannerObserver> + 'static,
    {
        self.observer_factory = Some(Box::new(factory));
        self
    }

    pub fn agent(&self) -> KinematicState {
        self.agent
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn hazards(&self) -> &HazardGrid {
        &self.hazards
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    /// Plan and apply one action. Returns `None` once the episode is over.
    pub fn step(&mut self) -> Option<FrameRecord> {
        if self.status != EpisodeStatus::Running {
            return None;
        }
        if self.frame >= self.config.frames {
            self.status = EpisodeStatus::Finished;
            return None;
        }

        let state = PerceptionSnapshot::sense(
            &self.terrain,
            &self.hazards,
            self.agent.row,
            self.agent.col,
            self.agent.grounded,
            self.agent.can_jump,
        )
        .to_state();

        let mut planner = Planner::with_config(
            &self.terrain,
            self.hazards.clone(),
            self.config.planner,
            self.config.physics,
        );
        if let Some(factory) = &self.observer_factory {
            planner = planner.with_observer(factory());
        }
        let report = planner.plan_detailed(&state);

        let mut action = report.action;
        let survival = self.config.survival_jump && survival_override(&state, action).is_some();
        if survival {
            action = Action::Jump;
            debug!(frame = self.frame, gap = state.gap_distance, "Survival jump over gap");
        }

        let simulator = Simulator::new(&self.terrain, self.config.physics);
        let next = simulator.simulate(&mut self.hazards, &state, action);

        debug!(
            frame = self.frame,
            from = ?(state.row, state.col),
            action = %action,
            outcome = ?report.outcome,
            to = ?next.map(|s| (s.row, s.col)),
            "Frame"
        );

        match next {
            Some(next) => self.agent = next,
            None => {
                warn!(frame = self.frame, action = %action, "Agent lost");
                self.status = EpisodeStatus::Lost;
            }
        }

        let record = FrameRecord {
            frame: self.frame,
            state,
            action,
            outcome: report.outcome,
            survival_jump: survival,
            next,
        };
        self.frame += 1;
        Some(record)
    }

    /// Step until the frame budget is spent or the agent is lost.
    pub fn run(&mut self) -> Vec<FrameRecord> {
        let records: Vec<FrameRecord> = std::iter::from_fn(|| self.step()).collect();
        if self.status == EpisodeStatus::Running {
            self.status = EpisodeStatus::Finished;
        }
        info!(
            frames = records.len(),
            status = ?self.status,
            col = self.agent.col,
            hazards_left = self.hazards.count(),
            "Episode over"
        );
        records
    }
}

/// A reflex jump for when the planner returns `Action::None` while standing
/// right at the edge of a gap.
pub fn survival_override(state: &KinematicState, planned: Action) -> Option<Action> {
    let at_edge = state.grounded && state.can_jump && state.gap_distance == 1;
    (planned == Action::None && at_edge).then_some(Action::Jump)
}
