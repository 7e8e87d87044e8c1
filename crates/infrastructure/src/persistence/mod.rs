//! File-backed configuration.

mod settings_file;

pub use settings_file::{SettingsError, SettingsFile};
