/// Core error types for Chorus
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced by the core crate (settings load/persist)
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Settings could not be serialized for persistence
    #[error("Settings serialize error: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),
}
