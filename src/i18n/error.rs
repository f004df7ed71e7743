use std::path::PathBuf;

use thiserror::Error;

use super::format::FormatError;
use super::properties::PropertiesError;
use super::Language;

/// Errors raised by resource lookup and rendering.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No resource has been registered under the key.
    #[error("There is no resource defined for the key {key}")]
    UnknownKey { key: String },

    /// The key is already registered; extend it with a translation instead.
    #[error("The key {key} is already being used. Consider using add_translation instead")]
    DuplicateKey { key: String },

    /// The resource exists but has no template for the language.
    #[error("The resource {key} doesn't have a translation for {language}")]
    MissingTranslation { key: String, language: Language },

    /// The formatting arguments don't fit the template.
    #[error("Could not format resource {key} for {language}: {source}")]
    Formatting {
        key: String,
        language: Language,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Errors raised while loading translation files.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The file is named like a translation file but the suffix is no language.
    #[error("Unknown language '{name}' in translation file {}", .path.display())]
    UnknownLanguage { path: PathBuf, name: String },

    /// The translations directory exists but could not be listed.
    #[error("Could not read translations directory {}: {source}", .path.display())]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read translation file {}: {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed translation file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: PropertiesError,
    },
}

impl ConfigurationError {
    /// The file or directory the error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConfigurationError::UnknownLanguage { path, .. }
            | ConfigurationError::UnreadableDirectory { path, .. }
            | ConfigurationError::UnreadableFile { path, .. }
            | ConfigurationError::Malformed { path, .. } => path,
        }
    }
}
