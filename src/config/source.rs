//! `config.ini` access on top of `rust-ini`
//!
//! Sections keep their file order (profile enumeration depends on it). Keys are
//! matched case-insensitively, section names are case-sensitive, values in a
//! `[DEFAULT]` section are visible from every other section, and `%(key)s`
//! references are expanded when a value is read.

use ini::{Ini, ParseOption, Properties};
use std::borrow::Cow;
use std::collections::BTreeSet;

use super::error::{ConfigError, ConfigResult};

const DEFAULT_SECTION: &str = "DEFAULT";
const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Parsed configuration source
#[derive(Debug, Clone)]
pub struct ConfigSource {
    ini: Ini,
}

/// Read-only view of one section with `[DEFAULT]` fallback
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
    name: &'a str,
    properties: &'a Properties,
    defaults: Option<&'a Properties>,
}

fn lookup<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn malformed(description: String) -> ConfigError {
    ConfigError::Malformed { description }
}

impl<'a> SectionView<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Stored text of `key`, falling back to `[DEFAULT]`, without expansion
    fn raw(&self, key: &str) -> Option<&'a str> {
        lookup(self.properties, key).or_else(|| self.defaults.and_then(|d| lookup(d, key)))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Value of `key` with `%(name)s` references expanded and `%%` read as `%`
    pub fn get(&self, key: &str) -> ConfigResult<Option<Cow<'a, str>>> {
        let Some(raw) = self.raw(key) else {
            return Ok(None);
        };
        if !raw.contains('%') {
            return Ok(Some(Cow::Borrowed(raw)));
        }
        self.interpolate(key, raw, 1).map(|value| Some(Cow::Owned(value)))
    }

    fn interpolate(&self, key: &str, raw: &str, depth: usize) -> ConfigResult<String> {
        let fail = |description: String| ConfigError::Interpolation {
            section: self.name.to_string(),
            key: key.to_string(),
            description,
        };
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(fail(format!(
                "references nest deeper than {MAX_INTERPOLATION_DEPTH} levels"
            )));
        }

        let mut value = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(at) = rest.find('%') {
            value.push_str(&rest[..at]);
            rest = &rest[at + 1..];

            if let Some(tail) = rest.strip_prefix('%') {
                value.push('%');
                rest = tail;
                continue;
            }

            let reference = rest
                .strip_prefix('(')
                .and_then(|r| r.split_once(')'))
                .and_then(|(name, tail)| Some((name, tail.strip_prefix('s')?)))
                .filter(|(name, _)| !name.is_empty());
            let Some((name, tail)) = reference else {
                return Err(fail(format!("bad reference in '{raw}'")));
            };
            let target = self
                .raw(name)
                .ok_or_else(|| fail(format!("'{name}' is not defined")))?;
            value.push_str(&self.interpolate(key, target, depth + 1)?);
            rest = tail;
        }
        value.push_str(rest);
        Ok(value)
    }
}

impl ConfigSource {
    /// Parse INI text
    ///
    /// Lines starting with `#` or `;` are comments and indented lines continue
    /// the previous value. A key before any section header, a line without a
    /// `=`/`:` delimiter, and duplicate sections or keys are rejected.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            enabled_indented_mutiline_value: true,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options)?;

        if ini.section(None::<String>).is_some_and(|p| !p.is_empty()) {
            return Err(malformed("key/value pair before any section header".to_string()));
        }

        let mut seen = BTreeSet::new();
        for (name, properties) in ini.iter() {
            let Some(name) = name else { continue };
            if !seen.insert(name) {
                return Err(malformed(format!("duplicate section '{name}'")));
            }

            let mut keys = BTreeSet::new();
            for (key, _) in properties.iter() {
                if let Some((line, _)) = key.split_once('\n') {
                    return Err(malformed(format!(
                        "expected 'key = value' in section '{name}', found '{line}'"
                    )));
                }
                if !keys.insert(key.to_lowercase()) {
                    return Err(malformed(format!(
                        "duplicate key '{key}' in section '{name}'"
                    )));
                }
            }
        }

        Ok(Self { ini })
    }

    /// Sections in file order, excluding `[DEFAULT]`
    pub fn sections(&self) -> impl Iterator<Item = SectionView<'_>> {
        let defaults = self.ini.section(Some(DEFAULT_SECTION));
        self.ini.iter().filter_map(move |(name, properties)| {
            let name = name.filter(|n| *n != DEFAULT_SECTION)?;
            Some(SectionView {
                name,
                properties,
                defaults,
            })
        })
    }

    pub fn section(&self, name: &str) -> Option<SectionView<'_>> {
        self.sections().find(|s| s.name() == name)
    }
}
