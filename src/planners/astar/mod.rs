//! Short-horizon best-first search over a quantized platformer physics model.
//!
//! A fresh [`Planner`] is built every frame from the current terrain and
//! hazard grids, asked for one action, and thrown away.

mod config;
mod heuristic;
mod node;
mod planner;
mod simulator;

pub use config::{HeuristicWeights, PhysicsConfig, PlannerConfig};
pub use heuristic::Heuristic;
pub use node::SearchNode;
pub use planner::{PlanOutcome, PlanReport, Planner, PlannerPhase};
pub use simulator::Simulator;
