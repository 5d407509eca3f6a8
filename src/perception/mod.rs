//! Game screen perception
//!
//! This module provides:
//! - Named template queries with fixed confidence thresholds
//! - Status bar gauge readings from sampled pixels
//! - Capture regions derived from the game window placement
//! - Locale asset integrity checks

pub mod assets;
pub mod config;
pub mod error;
pub mod gauge;
pub mod monitor;
pub mod region;
pub mod screen;


pub use assets::verify_assets;
pub use config::{MatchMode, TemplateSpec};
pub use error::{PerceptionError, PerceptionResult};
pub use monitor::PerceptionEngine;
pub use region::{CaptureRegionResolver, WindowSize};
pub use screen::{FixedWindow, FrameScreen, Screen, WindowGeometry};
