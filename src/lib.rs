pub mod app;
pub mod args;
pub mod config;
pub mod perception;
pub mod template_matching;

pub use config::{ConfigError, ConfigResolver, Settings};
pub use perception::{PerceptionEngine, PerceptionError};
