//! The resolved settings snapshot

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};
use super::schema::FieldType;

/// Token that coerces to `true`; every other string is `false`
pub const TRUE_TOKEN: &str = "True";

/// A typed configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<String>),
    /// Explicit "none" fallback, distinct from an unset field
    Null,
}

impl SettingValue {
    /// Coerce a raw string per its declared type
    ///
    /// Booleans compare literally against `"True"` (case-sensitive) and never
    /// fail. Integers and floats use the standard parser; failure is reported
    /// to the caller.
    pub fn coerce(raw: &str, ty: FieldType) -> Result<Self, &'static str> {
        match ty {
            FieldType::Str => Ok(SettingValue::Str(raw.to_string())),
            FieldType::Bool => Ok(SettingValue::Bool(raw == TRUE_TOKEN)),
            FieldType::Int => raw
                .trim()
                .parse::<i64>()
                .map(SettingValue::Int)
                .map_err(|_| ty.name()),
            FieldType::Float => raw
                .trim()
                .parse::<f64>()
                .map(SettingValue::Float)
                .map_err(|_| ty.name()),
        }
    }

    /// Whether this value can live in a field of type `ty`
    ///
    /// `Null` fits every type; an integer is accepted where a float is expected.
    pub fn conforms_to(&self, ty: FieldType) -> bool {
        matches!(
            (self, ty),
            (SettingValue::Null, _)
                | (SettingValue::Str(_), FieldType::Str)
                | (SettingValue::Bool(_), FieldType::Bool)
                | (SettingValue::Int(_), FieldType::Int)
                | (SettingValue::Int(_), FieldType::Float)
                | (SettingValue::Float(_), FieldType::Float)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingValue::Float(f) => Some(*f),
            SettingValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Str(s) => f.write_str(s),
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Float(v) => write!(f, "{v}"),
            SettingValue::List(items) => write!(f, "[{}]", items.join(", ")),
            SettingValue::Null => f.write_str("None"),
        }
    }
}

/// Split a comma separated field into trimmed tokens, keeping order
///
/// Empty tokens are kept, so `"a,,b"` has three entries and `""` has one.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|token| token.trim().to_string()).collect()
}

/// Settings snapshot shared by the perception layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Settings {
    values: BTreeMap<String, SettingValue>,
    image_dir: PathBuf,
}

impl Settings {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            values: BTreeMap::new(),
            image_dir: image_dir.into(),
        }
    }

    /// Locale-scoped template directory
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub(crate) fn set_image_dir(&mut self, image_dir: PathBuf) {
        self.image_dir = image_dir;
    }

    pub fn set(&mut self, name: &str, value: SettingValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(SettingValue::as_str)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(SettingValue::as_bool)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(SettingValue::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(SettingValue::as_float)
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(SettingValue::as_list)
    }

    /// Float field that the caller cannot work without
    pub fn require_float(&self, name: &str) -> ConfigResult<f64> {
        self.float(name).ok_or_else(|| ConfigError::MissingField {
            section: "settings".to_string(),
            key: name.to_string(),
        })
    }

    pub fn require_str(&self, name: &str) -> ConfigResult<&str> {
        self.str(name).ok_or_else(|| ConfigError::MissingField {
            section: "settings".to_string(),
            key: name.to_string(),
        })
    }

    /// Fishes still fitting in the keepnet, never negative
    pub fn fishes_to_catch(&self) -> Option<i64> {
        let limit = self.int("keepnet_limit")?;
        let current = self.int("fishes_in_keepnet").unwrap_or(0);
        Some((limit - current).max(0))
    }
}
