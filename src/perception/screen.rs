//! Where frames and window placement come from
//!
//! The engine only talks to these traits, so a live capture backend and a
//! recorded screenshot are interchangeable.

use super::error::{PerceptionError, PerceptionResult};
use crate::template_matching::Rect;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Source of full-screen frames
pub trait Screen {
    /// Capture the whole screen
    fn grab(&self) -> PerceptionResult<RgbImage>;

    /// Capture only `region`, given in screen coordinates
    fn grab_region(&self, region: Rect) -> PerceptionResult<RgbImage> {
        let frame = self.grab()?;
        crop(&frame, region)
    }

    /// Color of a single screen pixel
    fn pixel(&self, x: i32, y: i32) -> PerceptionResult<Rgb<u8>> {
        let frame = self.grab()?;
        pixel_at(&frame, x, y)
    }
}

/// Placement of the game window on screen
pub trait WindowGeometry {
    fn game_window_rect(&self) -> PerceptionResult<Rect>;
}

/// Copy `region` out of `frame`; the region must lie fully inside
pub fn crop(frame: &RgbImage, region: Rect) -> PerceptionResult<RgbImage> {
    let (width, height) = frame.dimensions();
    if region.left < 0
        || region.top < 0
        || region.width == 0
        || region.height == 0
        || region.right() > width as i32
        || region.bottom() > height as i32
    {
        return Err(PerceptionError::RegionOutOfBounds {
            region,
            width,
            height,
        });
    }

    Ok(image::imageops::crop_imm(
        frame,
        region.left as u32,
        region.top as u32,
        region.width,
        region.height,
    )
    .to_image())
}

fn pixel_at(frame: &RgbImage, x: i32, y: i32) -> PerceptionResult<Rgb<u8>> {
    if x < 0 || y < 0 {
        return Err(PerceptionError::PixelOutOfBounds { x, y });
    }
    frame
        .get_pixel_checked(x as u32, y as u32)
        .copied()
        .ok_or(PerceptionError::PixelOutOfBounds { x, y })
}

enum FrameSource {
    Memory(RgbImage),
    File(PathBuf),
}

/// Screen backed by a screenshot
///
/// A file-backed screen re-reads the file on every grab, so an external
/// capture tool can keep overwriting it.
pub struct FrameScreen {
    source: FrameSource,
}

impl FrameScreen {
    pub fn from_image(frame: RgbImage) -> Self {
        Self {
            source: FrameSource::Memory(frame),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: FrameSource::File(path.into()),
        }
    }

    fn load(path: &Path) -> PerceptionResult<RgbImage> {
        let frame = image::open(path).map_err(|e| PerceptionError::Capture {
            description: format!("cannot read frame {}: {e}", path.display()),
        })?;
        Ok(frame.to_rgb8())
    }
}

impl Screen for FrameScreen {
    fn grab(&self) -> PerceptionResult<RgbImage> {
        match &self.source {
            FrameSource::Memory(frame) => Ok(frame.clone()),
            FrameSource::File(path) => Self::load(path),
        }
    }

    fn grab_region(&self, region: Rect) -> PerceptionResult<RgbImage> {
        match &self.source {
            FrameSource::Memory(frame) => crop(frame, region),
            FrameSource::File(path) => crop(&Self::load(path)?, region),
        }
    }

    fn pixel(&self, x: i32, y: i32) -> PerceptionResult<Rgb<u8>> {
        match &self.source {
            FrameSource::Memory(frame) => pixel_at(frame, x, y),
            FrameSource::File(path) => pixel_at(&Self::load(path)?, x, y),
        }
    }
}

/// Game window at a known, unchanging position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWindow {
    rect: Rect,
}

impl FixedWindow {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// Window whose top-left corner is at (left, top)
    pub fn at(left: i32, top: i32) -> Self {
        Self::new(Rect::new(left, top, 0, 0))
    }
}

impl WindowGeometry for FixedWindow {
    fn game_window_rect(&self) -> PerceptionResult<Rect> {
        Ok(self.rect)
    }
}
