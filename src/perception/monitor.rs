//! Screen queries answered by template matching and pixel sampling

use super::config::*;
use super::error::{PerceptionError, PerceptionResult};
use super::gauge::{self, Gauge};
use super::region::CaptureRegionResolver;
use super::screen::{Screen, WindowGeometry};
use crate::config::Settings;
use crate::template_matching::{Matches, Rect, TemplateMatcher};
use image::{GrayImage, RgbImage};
use std::path::PathBuf;

/// Answers questions about what the game currently shows
///
/// Holds no state of its own: every query grabs a fresh frame and reloads its
/// template, so results always reflect the live screen.
pub struct PerceptionEngine<'a> {
    settings: &'a Settings,
    screen: &'a dyn Screen,
    window: &'a dyn WindowGeometry,
    regions: CaptureRegionResolver,
}

impl<'a> PerceptionEngine<'a> {
    pub fn new(
        settings: &'a Settings,
        screen: &'a dyn Screen,
        window: &'a dyn WindowGeometry,
    ) -> Self {
        Self {
            settings,
            screen,
            window,
            regions: CaptureRegionResolver,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// `<image_dir>/<name>.png`
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.settings.image_dir().join(format!("{name}.png"))
    }

    fn load_template(&self, name: &str) -> PerceptionResult<GrayImage> {
        let path = self.template_path(name);
        if !path.is_file() {
            log::error!("Template image {} is missing", path.display());
            return Err(PerceptionError::MissingTemplate { path });
        }
        let template = image::open(&path)
            .map_err(|source| PerceptionError::TemplateLoad { path, source })?;
        Ok(template.to_luma8())
    }

    fn grab_gray(&self) -> PerceptionResult<GrayImage> {
        Ok(image::imageops::grayscale(&self.screen.grab()?))
    }

    /// First position of template `name` on the current screen, in raster order
    pub fn locate(&self, name: &str, confidence: f32) -> PerceptionResult<Option<Rect>> {
        let template = self.load_template(name)?;
        let frame = self.grab_gray()?;
        let found = TemplateMatcher::new(confidence).find_first(&frame, &template);
        match &found {
            Some(m) => log::debug!("🎯 {}", m.describe(name)),
            None => log::trace!("{name} not on screen (> {confidence:.2})"),
        }
        Ok(found.map(|m| m.rect))
    }

    /// Like [`locate`](Self::locate), searching only inside `region`
    pub fn locate_in(
        &self,
        name: &str,
        confidence: f32,
        region: Rect,
    ) -> PerceptionResult<Option<Rect>> {
        let template = self.load_template(name)?;
        let frame = image::imageops::grayscale(&self.screen.grab_region(region)?);
        let found = TemplateMatcher::new(confidence)
            .with_origin(region.left, region.top)
            .find_first(&frame, &template);
        if let Some(m) = &found {
            log::debug!("🎯 {} in {region:?}", m.describe(name));
        }
        Ok(found.map(|m| m.rect))
    }

    /// Every non-overlapping position of template `name` in one frame
    pub fn locate_all(&self, name: &str, confidence: f32) -> PerceptionResult<Matches> {
        let template = self.load_template(name)?;
        let frame = self.grab_gray()?;
        Ok(TemplateMatcher::new(confidence).find_all(&frame, &template))
    }

    fn query(&self, spec: TemplateSpec) -> PerceptionResult<Option<Rect>> {
        self.locate(spec.name, spec.confidence)
    }

    /// Run `spec` in its own mode and collect the positions found
    pub fn run_query(&self, spec: &TemplateSpec) -> PerceptionResult<Vec<Rect>> {
        match spec.mode {
            MatchMode::Single => Ok(self.query(*spec)?.into_iter().collect()),
            MatchMode::Multiple => Ok(self.locate_all(spec.name, spec.confidence)?.rects().collect()),
        }
    }

    pub fn is_fish_species_matched(&self, species: &str) -> PerceptionResult<Option<Rect>> {
        self.locate(species, SPECIES_CONFIDENCE)
    }

    pub fn is_fish_marked(&self) -> PerceptionResult<Option<Rect>> {
        self.query(FISH_MARKED)
    }

    pub fn is_fish_yellow_marked(&self) -> PerceptionResult<Option<Rect>> {
        self.query(FISH_YELLOW_MARKED)
    }

    pub fn is_fish_hooked(&self) -> PerceptionResult<Option<Rect>> {
        self.query(FISH_HOOKED)
    }

    pub fn is_fish_captured(&self) -> PerceptionResult<Option<Rect>> {
        self.query(FISH_CAPTURED)
    }

    fn retrieval_confidence(&self) -> PerceptionResult<f32> {
        Ok(self.settings.require_float(RETRIEVAL_CONFIDENCE_FIELD)? as f32)
    }

    /// Rainbow line counter shows 5m or 0m
    pub fn is_rainbow_line_0or5m(&self) -> PerceptionResult<Option<Rect>> {
        let confidence = self.retrieval_confidence()?;
        for marker in RAINBOW_LINE_MARKERS {
            if let Some(rect) = self.locate(marker, confidence)? {
                return Ok(Some(rect));
            }
        }
        Ok(None)
    }

    pub fn is_spool_full(&self) -> PerceptionResult<Option<Rect>> {
        self.locate(SPOOL_FULL_MARKER, self.retrieval_confidence()?)
    }

    /// Retrieval end marker for the spool in use
    pub fn is_retrieval_finished(&self) -> PerceptionResult<Option<Rect>> {
        if self.settings.bool(RAINBOW_LINE_FIELD).unwrap_or(false) {
            self.is_rainbow_line_0or5m()
        } else {
            self.is_spool_full()
        }
    }

    pub fn is_tackle_ready(&self) -> PerceptionResult<Option<Rect>> {
        self.query(TACKLE_READY)
    }

    pub fn is_tackle_broken(&self) -> PerceptionResult<Option<Rect>> {
        self.query(TACKLE_BROKEN)
    }

    pub fn is_lure_broken(&self) -> PerceptionResult<Option<Rect>> {
        self.query(LURE_BROKEN)
    }

    pub fn is_moving_in_bottom_layer(&self) -> PerceptionResult<Option<Rect>> {
        self.query(BOTTOM_LAYER_MOVEMENT)
    }

    pub fn is_disconnected(&self) -> PerceptionResult<Option<Rect>> {
        self.query(DISCONNECTED)
    }

    pub fn is_line_at_end(&self) -> PerceptionResult<Option<Rect>> {
        self.query(LINE_AT_END)
    }

    pub fn is_ticket_expired(&self) -> PerceptionResult<Option<Rect>> {
        self.query(TICKET_EXPIRED)
    }

    pub fn is_operation_failed(&self) -> PerceptionResult<Option<Rect>> {
        self.query(OPERATION_FAILED)
    }

    pub fn is_operation_success(&self) -> PerceptionResult<Option<Rect>> {
        self.query(OPERATION_SUCCESS)
    }

    pub fn is_harvest_success(&self) -> PerceptionResult<Option<Rect>> {
        self.query(HARVEST_SUCCESS)
    }

    pub fn get_quit_position(&self) -> PerceptionResult<Option<Rect>> {
        self.query(QUIT_BUTTON)
    }

    pub fn get_yes_position(&self) -> PerceptionResult<Option<Rect>> {
        self.query(YES_BUTTON)
    }

    pub fn get_make_position(&self) -> PerceptionResult<Option<Rect>> {
        self.query(MAKE_BUTTON)
    }

    pub fn get_exit_icon_position(&self) -> PerceptionResult<Option<Rect>> {
        self.query(EXIT_ICON)
    }

    pub fn get_confirm_exit_icon_position(&self) -> PerceptionResult<Option<Rect>> {
        self.query(CONFIRM_EXIT_ICON)
    }

    pub fn get_food_position(&self, food: &str) -> PerceptionResult<Option<Rect>> {
        self.locate(food, FOOD_CONFIDENCE)
    }

    /// Boat ticket of the given duration in hours
    pub fn get_ticket_position(&self, duration: u32) -> PerceptionResult<Option<Rect>> {
        self.locate(&format!("ticket_{duration}"), TICKET_DURATION_CONFIDENCE)
    }

    pub fn get_scrollbar_position(&self) -> PerceptionResult<Option<Rect>> {
        self.query(SCROLLBAR)
    }

    pub fn get_100wear_position(&self) -> PerceptionResult<Option<Rect>> {
        self.query(FULL_WEAR)
    }

    pub fn get_favorite_item_positions(&self) -> PerceptionResult<Matches> {
        self.locate_all(FAVORITE_ITEM.name, FAVORITE_ITEM.confidence)
    }

    // ============================================================
    // Gauges
    // ============================================================

    fn read_gauge(&self, icon: &str, gauge: Gauge, fraction: f64) -> PerceptionResult<bool> {
        let Some(icon_rect) = self.locate(icon, GAUGE_ICON_CONFIDENCE)? else {
            log::debug!("{icon} icon not on screen");
            return Ok(false);
        };
        let (x, y) = icon_rect.center();
        let far = gauge.far_offset(fraction);
        let near_color = self.screen.pixel(x + gauge.start, y)?;
        let far_color = self.screen.pixel(x + far, y)?;
        let reading = gauge.read(near_color, far_color);
        log::debug!(
            "{icon} gauge at ({x},{y}): +{} {:?} vs +{far} {:?} -> {reading}",
            gauge.start,
            near_color.0,
            far_color.0
        );
        Ok(reading)
    }

    /// Energy bar reaches `energy_threshold`
    pub fn is_energy_high(&self) -> PerceptionResult<bool> {
        let threshold = self.settings.require_float(ENERGY_THRESHOLD_FIELD)?;
        self.read_gauge(ENERGY_ICON, gauge::ENERGY, threshold)
    }

    /// Food bar is below half
    pub fn is_hunger_low(&self) -> PerceptionResult<bool> {
        self.read_gauge(FOOD_ICON, gauge::HUNGER, gauge::HUNGER_FRACTION)
    }

    pub fn is_comfort_low(&self) -> PerceptionResult<bool> {
        self.read_gauge(COMFORT_ICON, gauge::COMFORT, gauge::COMFORT_FRACTION)
    }

    // ============================================================
    // Float camera
    // ============================================================

    pub fn float_camera_region(&self) -> PerceptionResult<Rect> {
        let window = self.window.game_window_rect()?;
        let size = self.settings.require_str(WINDOW_SIZE_FIELD)?;
        self.regions.resolve(window.top_left(), size)
    }

    /// Snapshot of the float camera, used as the reference for `is_float_still`
    pub fn capture_float_camera(&self) -> PerceptionResult<RgbImage> {
        let region = self.float_camera_region()?;
        self.screen.grab_region(region)
    }

    /// The float camera still shows `reference`
    pub fn is_float_still(&self, reference: &RgbImage) -> PerceptionResult<bool> {
        let region = self.float_camera_region()?;
        let confidence = self.settings.require_float(FLOAT_CONFIDENCE_FIELD)? as f32;
        let current = image::imageops::grayscale(&self.screen.grab_region(region)?);
        let reference = image::imageops::grayscale(reference);
        let found = TemplateMatcher::new(confidence)
            .with_origin(region.left, region.top)
            .find_first(&current, &reference);
        Ok(found.is_some())
    }
}
