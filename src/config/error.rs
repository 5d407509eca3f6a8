use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for configuration resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The error type for loading and merging the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config syntax error at {0}")]
    Syntax(#[from] ini::ParseError),

    #[error("Malformed config file: {description}")]
    Malformed { description: String },

    #[error("Cannot expand '{key}' in section '{section}': {description}")]
    Interpolation {
        section: String,
        key: String,
        description: String,
    },

    #[error("Section '{section}' not found in config file")]
    MissingSection { section: String },

    #[error("Key '{key}' not found in section '{section}'")]
    MissingField { section: String, key: String },

    #[error("Invalid value '{value}' for '{key}' in section '{section}': expected {expected}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid profile id {pid}, there are {count} profile(s)")]
    InvalidProfile { pid: usize, count: usize },

    #[error("Command line flag '{flag}' is not known to the argument source")]
    UnknownFlag { flag: String },

    #[error("Command line flag '{flag}' does not hold a {expected} value")]
    FlagType {
        flag: String,
        expected: &'static str,
    },
}
