mod action;
mod error;
mod observer;

pub use action::{Action, ControlKeys};
pub use error::{ConfigError, EpisodeError, GridError, LevelParseError};
pub use observer::{
    CompositeObserver, NoopObserver, PlanEvent, PlannerObserver, RecordingObserver, TracingObserver,
};
