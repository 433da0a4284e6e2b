mod hazards;
mod kinematic_state;
mod level;
mod perception;
mod terrain;

pub use hazards::HazardGrid;
pub use kinematic_state::KinematicState;
pub use level::Level;
pub use perception::PerceptionSnapshot;
pub use terrain::{TerrainGrid, Tile};
