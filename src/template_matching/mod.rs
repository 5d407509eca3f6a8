/// Template matching module for locating UI elements in captured frames
///
/// This module provides:
/// - Correlation coefficient scoring over grayscale frames
/// - First-match lookup above a confidence threshold
/// - Lazy enumeration of every non-overlapping match
pub mod correlation;
pub mod matcher;
pub mod types;

pub use matcher::{Matches, TemplateMatcher};
pub use types::{Match, Rect};
