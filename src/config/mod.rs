//! Layered configuration for the automation loop
//!
//! `config.ini` provides the `[game]` and `[shortcut]` base layer plus any number
//! of profile sections; command-line overrides sit on top. See [`resolver`] for
//! the merge order.

pub mod error;
pub mod resolver;
pub mod schema;
pub mod settings;
pub mod source;


pub use error::{ConfigError, ConfigResult};
pub use resolver::{ArgSource, ArgSpec, BaseSettings, ConfigResolver, OverriddenSettings, profile_rows};
pub use schema::{FieldSpec, FieldType};
pub use settings::{SettingValue, Settings};
pub use source::{ConfigSource, SectionView};
