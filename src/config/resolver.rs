//! Three-tier configuration resolution
//!
//! Precedence, lowest first: the `[game]`/`[shortcut]` base layer, the selected
//! profile section, then command-line overrides. Resolution is a chain of
//! consuming steps so profile fields cannot be merged before the overrides that
//! may select their schema:
//!
//! `ConfigResolver::resolve_base` -> `BaseSettings::merge_args` ->
//! `OverriddenSettings::resolve_profile`

use log::{debug, error, info, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};
use super::source::{ConfigSource, SectionView};
use super::schema::{
    BOTTOM_RODS_FIELD, COMMON_FIELDS, EDIT_CONFIG_ENTRY, FieldSpec, FieldType, GAME_SECTION,
    GENERAL_FIELDS, SHORTCUT_SECTION, SHORTCUTS, STRATEGIES, STRATEGY_KEY, WHITELIST_FIELD,
    strategy_fields,
};
use super::settings::{SettingValue, Settings, split_list};

const STATIC_DIR: &str = "static";

/// Parsed command-line values, looked up by flag name
pub trait ArgSource {
    /// Value of `flag`, `None` when the source does not know the flag
    fn arg_value(&self, flag: &str) -> Option<SettingValue>;
}

impl ArgSource for std::collections::BTreeMap<String, SettingValue> {
    fn arg_value(&self, flag: &str) -> Option<SettingValue> {
        self.get(flag).cloned()
    }
}

impl ArgSource for std::collections::HashMap<String, SettingValue> {
    fn arg_value(&self, flag: &str) -> Option<SettingValue> {
        self.get(flag).cloned()
    }
}

/// Maps a command-line flag onto a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub flag: &'static str,
    pub field: &'static str,
    pub ty: FieldType,
}

/// Loaded configuration source and its profile index
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    source: ConfigSource,
    config_path: PathBuf,
    static_root: PathBuf,
    profile_names: Vec<String>,
}

impl ConfigResolver {
    /// Read and parse `path`; templates are expected in `static/` beside it
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            error!("Failed to read config file {:?}: {}", path, source);
            ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let static_root = path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(STATIC_DIR);
        Self::from_source(&text, path, static_root)
    }

    pub fn from_source(
        text: &str,
        config_path: impl Into<PathBuf>,
        static_root: impl Into<PathBuf>,
    ) -> ConfigResult<Self> {
        let source = ConfigSource::parse(text).inspect_err(|e| error!("{e}"))?;

        let mut profile_names = vec![EDIT_CONFIG_ENTRY.to_string()];
        profile_names.extend(
            source
                .sections()
                .filter(|s| s.contains_key(STRATEGY_KEY))
                .map(|s| s.name().to_string()),
        );
        debug!("Found {} profile(s)", profile_names.len() - 1);

        Ok(Self {
            source,
            config_path: config_path.into(),
            static_root: static_root.into(),
            profile_names,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn static_root(&self) -> &Path {
        &self.static_root
    }

    /// Profile names in file order, index 0 is the "edit configuration file" entry
    pub fn profile_names(&self) -> &[String] {
        &self.profile_names
    }

    pub fn is_valid_profile_index(&self, pid: usize) -> bool {
        pid < self.profile_names.len()
    }

    fn profile_section(&self, pid: usize) -> ConfigResult<SectionView<'_>> {
        let invalid = || ConfigError::InvalidProfile {
            pid,
            count: self.profile_names.len() - 1,
        };
        if pid == 0 {
            return Err(invalid());
        }
        let name = self.profile_names.get(pid).ok_or_else(invalid)?;
        self.source.section(name).ok_or_else(invalid)
    }

    /// Merge the unconditional base layer: general fields and shortcuts
    pub fn resolve_base(&self) -> ConfigResult<BaseSettings<'_>> {
        let mut settings = Settings::default();
        merge_general_fields(&self.source, &mut settings)?;
        merge_shortcuts(&self.source, &mut settings)?;

        let language = settings.str("language").ok_or_else(|| {
            error!("Key 'language' is required to locate the image directory");
            ConfigError::MissingField {
                section: GAME_SECTION.to_string(),
                key: "language".to_string(),
            }
        })?;
        let image_dir = self.static_root.join(language);
        settings.set_image_dir(image_dir);

        Ok(BaseSettings {
            resolver: self,
            settings,
        })
    }
}

/// Snapshot holding the base layer only
#[derive(Debug)]
pub struct BaseSettings<'r> {
    resolver: &'r ConfigResolver,
    settings: Settings,
}

impl<'r> BaseSettings<'r> {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply command-line overrides on top of the base layer
    pub fn merge_args(
        mut self,
        args: &dyn ArgSource,
        arg_map: &[ArgSpec],
    ) -> ConfigResult<OverriddenSettings<'r>> {
        let mut pinned = BTreeSet::new();
        merge_args(&mut self.settings, args, arg_map, &mut pinned)?;
        Ok(OverriddenSettings {
            resolver: self.resolver,
            settings: self.settings,
            pinned,
        })
    }

    /// Snapshot for tools that take neither overrides nor a profile
    pub fn finish(self) -> Settings {
        self.settings
    }
}

/// Snapshot with command-line overrides applied, ready for a profile
#[derive(Debug)]
pub struct OverriddenSettings<'r> {
    resolver: &'r ConfigResolver,
    settings: Settings,
    pinned: BTreeSet<String>,
}

impl<'r> OverriddenSettings<'r> {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fields that came from the command line
    pub fn pinned(&self) -> impl Iterator<Item = &str> {
        self.pinned.iter().map(String::as_str)
    }

    /// Merge another batch of overrides
    pub fn merge_args(mut self, args: &dyn ArgSource, arg_map: &[ArgSpec]) -> ConfigResult<Self> {
        merge_args(&mut self.settings, args, arg_map, &mut self.pinned)?;
        Ok(self)
    }

    /// Merge profile `pid` and its strategy schema
    pub fn resolve_profile(mut self, pid: usize) -> ConfigResult<Settings> {
        let section = self.resolver.profile_section(pid)?;
        info!("Using profile '{}'", section.name());
        merge_profile_fields(section, &mut self.settings, &self.pinned)?;
        Ok(self.settings)
    }

    /// Snapshot without any profile
    pub fn finish(self) -> Settings {
        self.settings
    }
}

fn invalid_value(section: &str, spec: &FieldSpec, raw: &str) -> ConfigError {
    let err = ConfigError::InvalidValue {
        section: section.to_string(),
        key: spec.name.to_string(),
        value: raw.to_string(),
        expected: spec.ty.name(),
    };
    error!("{err}");
    err
}

/// Merge `[game]`; a missing key is a warning and leaves the field unset
pub fn merge_general_fields(source: &ConfigSource, settings: &mut Settings) -> ConfigResult<()> {
    let section = source.section(GAME_SECTION).ok_or_else(|| {
        error!("Section '{}' not found in config file", GAME_SECTION);
        ConfigError::MissingSection {
            section: GAME_SECTION.to_string(),
        }
    })?;

    let mut merged = Vec::with_capacity(GENERAL_FIELDS.len());
    for spec in GENERAL_FIELDS {
        match section.get(spec.name)? {
            Some(raw) => {
                let value = SettingValue::coerce(&raw, spec.ty)
                    .map_err(|_| invalid_value(GAME_SECTION, spec, &raw))?;
                merged.push((spec.name, value));
            }
            None => warn!("Key '{}' not found in section '{}'", spec.name, GAME_SECTION),
        }
    }
    for (name, value) in merged {
        settings.set(name, value);
    }

    let whitelist = match settings.get(WHITELIST_FIELD) {
        Some(SettingValue::Str(raw)) => split_list(raw),
        _ => Vec::new(),
    };
    settings.set(WHITELIST_FIELD, SettingValue::List(whitelist));
    Ok(())
}

/// Merge `[shortcut]`; absent keys become `Null` without a warning
pub fn merge_shortcuts(source: &ConfigSource, settings: &mut Settings) -> ConfigResult<()> {
    match source.section(SHORTCUT_SECTION) {
        Some(section) => {
            for (key, field) in SHORTCUTS {
                let value = section
                    .get(key)?
                    .map(|raw| SettingValue::Str(raw.into_owned()))
                    .unwrap_or(SettingValue::Null);
                settings.set(field, value);
            }
        }
        None => error!("Section '{}' not found in config file", SHORTCUT_SECTION),
    }

    let rods = match settings.get(BOTTOM_RODS_FIELD) {
        Some(SettingValue::Str(raw)) => split_list(raw),
        _ => Vec::new(),
    };
    settings.set(BOTTOM_RODS_FIELD, SettingValue::List(rods));
    Ok(())
}

/// Copy each mapped flag into `settings`, overwriting prior values
pub fn merge_args(
    settings: &mut Settings,
    args: &dyn ArgSource,
    arg_map: &[ArgSpec],
    pinned: &mut BTreeSet<String>,
) -> ConfigResult<()> {
    for spec in arg_map {
        let value = args.arg_value(spec.flag).ok_or_else(|| ConfigError::UnknownFlag {
            flag: spec.flag.to_string(),
        })?;
        if !value.conforms_to(spec.ty) {
            return Err(ConfigError::FlagType {
                flag: spec.flag.to_string(),
                expected: spec.ty.name(),
            });
        }
        debug!("Override {} = {} (--{})", spec.field, value, spec.flag);
        settings.set(spec.field, value);
        pinned.insert(spec.field.to_string());
    }
    Ok(())
}

fn profile_value(section: SectionView<'_>, spec: &FieldSpec) -> ConfigResult<SettingValue> {
    match (spec.ty, section.get(spec.name)?) {
        (FieldType::Bool, raw) => Ok(SettingValue::Bool(
            raw.as_deref().unwrap_or("False") == super::settings::TRUE_TOKEN,
        )),
        (_, None) => Ok(SettingValue::Null),
        (ty, Some(raw)) => {
            SettingValue::coerce(&raw, ty).map_err(|_| invalid_value(section.name(), spec, &raw))
        }
    }
}

fn merge_fields(
    section: SectionView<'_>,
    fields: &[FieldSpec],
    settings: &mut Settings,
    pinned: &BTreeSet<String>,
) -> ConfigResult<()> {
    for spec in fields {
        // A non-null command-line value outranks the profile
        let overridden = pinned.contains(spec.name)
            && settings.get(spec.name).is_some_and(|v| !v.is_null());
        if overridden {
            debug!("Keeping command line value for '{}'", spec.name);
            continue;
        }
        let value = profile_value(section, spec)?;
        settings.set(spec.name, value);
    }
    Ok(())
}

/// Merge a profile section: the common schema, then the strategy schema
///
/// Missing keys fall back to `"False"` for booleans and `Null` otherwise. The
/// strategy schema is selected by the `fishing_strategy` value present after
/// the common merge; an unknown strategy merges no extra fields.
pub fn merge_profile_fields(
    section: SectionView<'_>,
    settings: &mut Settings,
    pinned: &BTreeSet<String>,
) -> ConfigResult<()> {
    merge_fields(section, COMMON_FIELDS, settings, pinned)?;

    let strategy = settings.str(STRATEGY_KEY).unwrap_or_default().to_string();
    if !STRATEGIES.contains(&strategy.as_str()) {
        debug!("Strategy '{}' has no extra fields", strategy);
    }
    merge_fields(section, strategy_fields(&strategy), settings, pinned)
}

/// (label, value) rows describing the profile part of `settings`
pub fn profile_rows(settings: &Settings) -> Vec<(&'static str, String)> {
    let strategy = settings.str(STRATEGY_KEY).unwrap_or_default();
    COMMON_FIELDS
        .iter()
        .chain(strategy_fields(strategy))
        .map(|spec| {
            let value = settings
                .get(spec.name)
                .map(ToString::to_string)
                .unwrap_or_else(|| "unset".to_string());
            (spec.label, value)
        })
        .collect()
}
