//! Field tables for every configuration section
//!
//! Each table is an ordered list of (attribute name, display label, type).
//! The order is the merge order and the order used when printing a profile.

use std::fmt;

/// Expected type of a configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Bool,
    Int,
    Float,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Str => "string",
            FieldType::Bool => "boolean",
            FieldType::Int => "integer",
            FieldType::Float => "float",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared field: attribute name, display label, type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, label: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, label, ty }
}

use FieldType::{Bool, Float, Int, Str};

pub const GAME_SECTION: &str = "game";
pub const SHORTCUT_SECTION: &str = "shortcut";
pub const STRATEGY_KEY: &str = "fishing_strategy";
pub const EDIT_CONFIG_ENTRY: &str = "edit configuration file";

pub const WHITELIST_FIELD: &str = "unmarked_release_whitelist";
pub const BOTTOM_RODS_FIELD: &str = "bottom_rods_shortcuts";

/// Fields of the `[game]` section
pub const GENERAL_FIELDS: &[FieldSpec] = &[
    field("language", "Language", Str),
    field("window_size", "Window size", Str),
    field("default_arguments", "Default arguments", Str),
    field("confirmation_enabled", "Enable confirmation", Bool),
    field("SMTP_validation_enabled", "Enable SMTP validation", Bool),
    field("image_verification_enabled", "Enable image verification", Bool),
    field("coffee_limit", "Coffee limit", Int),
    field("keepnet_limit", "Keepnet limit", Int),
    field("keep_fish_delay", "Keep fish delay", Float),
    field("energy_threshold", "Energy threshold", Float),
    field("retrieval_detect_confidence", "Retrieve detect confidence", Float),
    field("alcohol_drinking_delay", "Alcohol drinking delay", Float),
    field("alcohol_drinking_quantity", "Alcohol drinking quantity", Int),
    field("lure_broken_action", "Lure broken action", Str),
    field("keepnet_full_action", "Keep net full action", Str),
    field("alarm_sound_file", "Alarm sound file", Str),
    field(WHITELIST_FIELD, "Unmarked release whitelist", Str),
];

/// `[shortcut]` keys and the attribute each one is stored under
pub const SHORTCUTS: &[(&str, &str)] = &[
    ("tea", "tea_shortcut"),
    ("carrot", "carrot_shortcut"),
    ("coffee", "coffee_shortcut"),
    ("shovel_spoon", "shovel_spoon_shortcut"),
    ("alcohol", "alcohol_shortcut"),
    ("bottom_rods", BOTTOM_RODS_FIELD),
    ("quit", "quitting_shortcut"),
];

/// Fields every profile section carries regardless of strategy
pub const COMMON_FIELDS: &[FieldSpec] = &[
    field(STRATEGY_KEY, "Fishing strategy", Str),
    field("cast_power_level", "Cast power level", Float),
    field("cast_delay", "Cast delay", Float),
    field("post_acceleration_enabled", "Enable post-acceleration", Str),
];

const SPIN_WITH_PAUSE_FIELDS: &[FieldSpec] = &[
    field("retrieval_duration", "Retrieval duration", Float),
    field("retrieval_delay", "Retrieval delay", Float),
    field("pre_acceleration_enabled", "Enable pre-acceleration", Bool),
];

const BOTTOM_FIELDS: &[FieldSpec] = &[
    field("check_delay", "Check delay", Float),
    field("min_deviation", "Min deviation", Float),
    field("max_deviation", "Max deviation", Float),
];

// marine and wakey_rig share the same tunables
const PIRK_FIELDS: &[FieldSpec] = &[
    field("sink_timeout", "Sink timeout", Float),
    field("pirk_duration", "Pirk duration", Float),
    field("pirk_delay", "Pirk delay", Float),
    field("pirk_timeout", "Pirk timeout", Float),
    field("tighten_duration", "Tighten duration", Float),
    field("fish_hooked_delay", "Fish hooked delay", Float),
];

const FLOAT_FIELDS: &[FieldSpec] = &[
    field("float_confidence", "Float confidence", Float),
    field("check_delay", "Check delay", Float),
    field("pull_delay", "Pull delay", Float),
    field("drifting_timeout", "Drifting timeout", Float),
];

/// Known strategies in display order
pub const STRATEGIES: &[&str] = &[
    "spin",
    "spin_with_pause",
    "bottom",
    "marine",
    "float",
    "wakey_rig",
];

/// Extra fields required by `strategy`
///
/// Unknown strategies have no extra tunables and yield an empty schema.
pub fn strategy_fields(strategy: &str) -> &'static [FieldSpec] {
    match strategy {
        "spin" => &[],
        "spin_with_pause" => SPIN_WITH_PAUSE_FIELDS,
        "bottom" => BOTTOM_FIELDS,
        "marine" | "wakey_rig" => PIRK_FIELDS,
        "float" => FLOAT_FIELDS,
        _ => &[],
    }
}
