//! Core engine services: phase driver, event tables, timing, configuration.

pub mod config;
pub mod engine;
pub mod event;
pub mod timer;

pub use config::{ConfigError, DisplayConfig, SetupConfig};
pub use engine::{DeinitArg, Engine, InitArg, ProcessArg, StopSignal};
pub use event::{EventDispatcher, Listener, ListenerRef};
pub use timer::Timer;
