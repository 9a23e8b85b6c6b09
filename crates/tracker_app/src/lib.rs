//! Tracker app: session facade that drives the core state machine and runs
//! its effects against the engine. Any UI layer can sit on top of [`Session`].
mod config;
mod effects;
mod session;

pub use config::{init_logging, ConfigError, LogTarget, TrackerConfig};
pub use effects::{EffectOutcome, EffectRunner};
pub use session::Session;
