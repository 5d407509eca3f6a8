//! Templates and thresholds for every screen query

/// How many positions a query reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Best position only
    Single,
    /// Every non-overlapping position
    Multiple,
}

/// A template basename and the confidence it must reach
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateSpec {
    pub name: &'static str,
    pub confidence: f32,
    pub mode: MatchMode,
}

impl TemplateSpec {
    pub const fn single(name: &'static str, confidence: f32) -> Self {
        Self {
            name,
            confidence,
            mode: MatchMode::Single,
        }
    }

    pub const fn multiple(name: &'static str, confidence: f32) -> Self {
        Self {
            name,
            confidence,
            mode: MatchMode::Multiple,
        }
    }
}

// Fish state
pub const FISH_MARKED: TemplateSpec = TemplateSpec::single("mark", 0.7);
pub const FISH_YELLOW_MARKED: TemplateSpec = TemplateSpec::single("trophy", 0.7);
pub const FISH_HOOKED: TemplateSpec = TemplateSpec::single("get", 0.9);
pub const FISH_CAPTURED: TemplateSpec = TemplateSpec::single("keep", 0.9);

// Tackle state
pub const TACKLE_READY: TemplateSpec = TemplateSpec::single("ready", 0.6);
pub const TACKLE_BROKEN: TemplateSpec = TemplateSpec::single("broke", 0.6);
pub const LURE_BROKEN: TemplateSpec = TemplateSpec::single("lure_is_broken", 0.7);
pub const BOTTOM_LAYER_MOVEMENT: TemplateSpec = TemplateSpec::single("movement", 0.7);
pub const LINE_AT_END: TemplateSpec = TemplateSpec::single("spooling", 0.98);

// Session and dialogs
pub const DISCONNECTED: TemplateSpec = TemplateSpec::single("disconnected", 0.9);
pub const TICKET_EXPIRED: TemplateSpec = TemplateSpec::single("ticket", 0.9);
pub const OPERATION_FAILED: TemplateSpec = TemplateSpec::single("warning", 0.8);
pub const OPERATION_SUCCESS: TemplateSpec = TemplateSpec::single("ok", 0.8);
pub const HARVEST_SUCCESS: TemplateSpec = TemplateSpec::single("harvest_confirm", 0.8);

// Clickable targets
pub const QUIT_BUTTON: TemplateSpec = TemplateSpec::single("quit", 0.8);
pub const YES_BUTTON: TemplateSpec = TemplateSpec::single("yes", 0.8);
pub const MAKE_BUTTON: TemplateSpec = TemplateSpec::single("make", 0.9);
pub const EXIT_ICON: TemplateSpec = TemplateSpec::single("exit", 0.8);
pub const CONFIRM_EXIT_ICON: TemplateSpec = TemplateSpec::single("confirm_exit", 0.8);
pub const SCROLLBAR: TemplateSpec = TemplateSpec::single("scrollbar", 0.97);
pub const FULL_WEAR: TemplateSpec = TemplateSpec::single("100wear", 0.98);
pub const FAVORITE_ITEM: TemplateSpec = TemplateSpec::multiple("favorite", 0.95);

/// Confidence for templates named at call time
pub const SPECIES_CONFIDENCE: f32 = 0.9;
pub const FOOD_CONFIDENCE: f32 = 0.8;
pub const TICKET_DURATION_CONFIDENCE: f32 = 0.95;

/// Status bar icons, located before their gauge is sampled
pub const GAUGE_ICON_CONFIDENCE: f32 = 0.8;
pub const ENERGY_ICON: &str = "energy";
pub const FOOD_ICON: &str = "food";
pub const COMFORT_ICON: &str = "comfort";

/// Retrieval markers; their confidence comes from settings
pub const RAINBOW_LINE_MARKERS: [&str; 2] = ["5m", "0m"];
pub const SPOOL_FULL_MARKER: &str = "wheel";

// Settings read by the perception layer
pub const RETRIEVAL_CONFIDENCE_FIELD: &str = "retrieval_detect_confidence";
pub const FLOAT_CONFIDENCE_FIELD: &str = "float_confidence";
pub const ENERGY_THRESHOLD_FIELD: &str = "energy_threshold";
pub const WINDOW_SIZE_FIELD: &str = "window_size";
pub const RAINBOW_LINE_FIELD: &str = "rainbow_line_enabled";

/// Every query whose template name is fixed, for probing a frame
pub const FIXED_QUERIES: &[TemplateSpec] = &[
    FISH_MARKED,
    FISH_YELLOW_MARKED,
    FISH_HOOKED,
    FISH_CAPTURED,
    TACKLE_READY,
    TACKLE_BROKEN,
    LURE_BROKEN,
    BOTTOM_LAYER_MOVEMENT,
    LINE_AT_END,
    DISCONNECTED,
    TICKET_EXPIRED,
    OPERATION_FAILED,
    OPERATION_SUCCESS,
    HARVEST_SUCCESS,
    QUIT_BUTTON,
    YES_BUTTON,
    MAKE_BUTTON,
    EXIT_ICON,
    CONFIRM_EXIT_ICON,
    SCROLLBAR,
    FULL_WEAR,
    FAVORITE_ITEM,
];
