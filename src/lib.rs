pub mod episode;
pub mod infra;
pub mod planners;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use episode::{Episode, EpisodeConfig, EpisodeStatus, FrameRecord};
pub use infra::{Action, PlannerObserver};
pub use planners::astar::{
    PhysicsConfig, PlanOutcome, PlanReport, Planner, PlannerConfig, Simulator,
};
pub use state::{HazardGrid, KinematicState, Level, PerceptionSnapshot, TerrainGrid};
