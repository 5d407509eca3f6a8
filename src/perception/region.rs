//! Capture regions derived from the game window placement

use super::error::{PerceptionError, PerceptionResult};
use crate::template_matching::Rect;
use std::fmt;
use std::str::FromStr;

/// Side length of the float camera capture
pub const FLOAT_CAMERA_SIZE: u32 = 164;

/// Game window resolutions the capture offsets are calibrated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSize {
    Qhd,
    FullHd,
    HdPlus,
}

impl WindowSize {
    pub const ALL: [WindowSize; 3] = [WindowSize::Qhd, WindowSize::FullHd, WindowSize::HdPlus];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowSize::Qhd => "2560x1440",
            WindowSize::FullHd => "1920x1080",
            WindowSize::HdPlus => "1600x900",
        }
    }

    /// Offset of the float camera from the window's top-left corner
    pub fn float_camera_offset(&self) -> (i32, i32) {
        match self {
            WindowSize::Qhd => (1198, 1192),
            WindowSize::FullHd => (878, 832),
            WindowSize::HdPlus => (718, 652),
        }
    }
}

impl FromStr for WindowSize {
    type Err = PerceptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowSize::ALL
            .into_iter()
            .find(|size| size.as_str() == s.trim())
            .ok_or_else(|| PerceptionError::UnsupportedWindowSize {
                size: s.to_string(),
            })
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a window anchor and resolution to capture rectangles
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureRegionResolver;

impl CaptureRegionResolver {
    /// Float camera region for a window whose top-left corner is `anchor`
    ///
    /// An unrecognized `window_size` is fatal to the caller and logged here.
    pub fn resolve(&self, anchor: (i32, i32), window_size: &str) -> PerceptionResult<Rect> {
        let size = window_size.parse::<WindowSize>().inspect_err(|_| {
            log::error!("Invalid window size '{window_size}'");
        })?;
        let (dx, dy) = size.float_camera_offset();
        let region = Rect::new(
            anchor.0 + dx,
            anchor.1 + dy,
            FLOAT_CAMERA_SIZE,
            FLOAT_CAMERA_SIZE,
        );
        log::debug!("Float camera region for {size}: {region:?}");
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sizes() {
        let resolver = CaptureRegionResolver;
        assert_eq!(
            resolver.resolve((0, 0), "2560x1440").unwrap(),
            Rect::new(1198, 1192, 164, 164)
        );
        assert_eq!(
            resolver.resolve((0, 0), "1920x1080").unwrap(),
            Rect::new(878, 832, 164, 164)
        );
        assert_eq!(
            resolver.resolve((0, 0), "1600x900").unwrap(),
            Rect::new(718, 652, 164, 164)
        );
    }

    #[test]
    fn test_anchor_is_added() {
        let region = CaptureRegionResolver.resolve((100, 50), "1920x1080").unwrap();
        assert_eq!(region, Rect::new(978, 882, 164, 164));

        let region = CaptureRegionResolver.resolve((-8, -31), "1600x900").unwrap();
        assert_eq!(region.top_left(), (710, 621));
    }

    #[test]
    fn test_unknown_size_is_error() {
        for size in ["1280x720", "", "1920X1080", "1920 x 1080"] {
            let err = CaptureRegionResolver.resolve((0, 0), size).unwrap_err();
            assert!(
                matches!(err, PerceptionError::UnsupportedWindowSize { .. }),
                "'{size}' should be unsupported"
            );
        }
    }

    #[test]
    fn test_window_size_round_trips_through_display() {
        for size in WindowSize::ALL {
            assert_eq!(size.to_string().parse::<WindowSize>().unwrap(), size);
        }
    }
}
