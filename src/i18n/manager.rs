//! Resource manager: the registry of canonical resources.
//!
//! The manager owns exactly one canonical [`Resource`] per key and is the
//! only place keys get registered. It bulk-loads `translations_<code>.properties`
//! files and enforces that a key is registered once.
//!
//! Most code should build a manager at startup and share it behind an `Arc`.
//! [`ResourceManager::global`] exists for call sites that cannot be handed
//! one; it is initialised once, from the environment, on first use.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::format::FormatArg;
use super::metrics::ResourceMetrics;
use super::properties;
use super::validator::{TranslationValidator, ValidationReport};
use super::{ConfigurationError, Language, Resource, ResourceError};
use crate::config::Config;

/// Global registry instance (initialized lazily)
static GLOBAL: OnceLock<ResourceManager> = OnceLock::new();

/// Outcome of loading a translations directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files loaded successfully, with their language
    pub files: Vec<(PathBuf, Language)>,

    /// Number of key/value entries read from the loaded files
    pub entries: usize,

    /// Files that could not be loaded. They contributed nothing.
    pub failures: Vec<ConfigurationError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The registry of canonical resources.
#[derive(Debug, Default)]
pub struct ResourceManager {
    resources: RwLock<HashMap<String, Resource>>,
    metrics: ResourceMetrics,
}

impl ResourceManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide registry.
    ///
    /// On first call this reads [`Config::from_env`] and loads the configured
    /// translations directory. Configuration problems are logged and the
    /// registry starts with whatever could be loaded; it is never torn down.
    pub fn global() -> &'static ResourceManager {
        GLOBAL.get_or_init(|| {
            let config = Config::from_env().unwrap_or_else(|e| {
                warn!("Invalid resource configuration, using defaults: {:#}", e);
                Config::default()
            });

            let manager = ResourceManager::new();
            if let Err(e) = manager.load_dir(&config.translations_dir) {
                warn!("Global resource registry starts without translations: {}", e);
            }
            manager
        })
    }

    /// Create a registry and load `dir` into it.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<(Self, LoadReport), ConfigurationError> {
        let manager = Self::new();
        let report = manager.load_dir(dir)?;
        Ok((manager, report))
    }

    pub fn metrics(&self) -> &ResourceMetrics {
        &self.metrics
    }

    /// Register `resource`'s translations as the canonical resource for `key`.
    ///
    /// # Errors
    /// [`ResourceError::DuplicateKey`] if `key` is already registered. Extend
    /// existing keys with [`Resource::add_translation`] or
    /// [`get_or_create`](Self::get_or_create) instead.
    pub fn add(&self, key: impl Into<String>, resource: Resource) -> Result<Resource, ResourceError> {
        let key = key.into();
        let mut resources = self.resources.write();
        if resources.contains_key(&key) {
            return Err(ResourceError::DuplicateKey { key });
        }

        let canonical = Resource::from_parts(Arc::from(key.as_str()), Arc::clone(resource.translations()));
        resources.insert(key, canonical.clone());
        self.metrics.record_key_created();
        Ok(canonical)
    }

    /// Register `resource` under its own key.
    pub fn register(&self, resource: Resource) -> Result<Resource, ResourceError> {
        let key = resource.key().to_string();
        self.add(key, resource)
    }

    /// The canonical resource for `key`, registering an empty one if the key
    /// is unknown.
    pub fn create(&self, key: &str) -> Resource {
        if let Some(existing) = self.resources.read().get(key) {
            return existing.clone();
        }

        let mut resources = self.resources.write();
        self.entry(&mut resources, key).clone()
    }

    /// The canonical resource for `key`.
    ///
    /// # Errors
    /// [`ResourceError::UnknownKey`] if `key` was never registered.
    pub fn get(&self, key: &str) -> Result<Resource, ResourceError> {
        self.metrics.record_lookup();
        match self.resources.read().get(key) {
            Some(resource) => Ok(resource.clone()),
            None => {
                self.metrics.record_unknown_key();
                Err(ResourceError::UnknownKey {
                    key: key.to_string(),
                })
            }
        }
    }

    /// The resource for `key` carrying `formatting`.
    ///
    /// With no formatting this is [`get`](Self::get). Otherwise the result is a
    /// new, unregistered resource sharing the canonical translations. Only
    /// registered keys can be formatted.
    pub fn get_formatted(
        &self,
        key: &str,
        formatting: Vec<FormatArg>,
    ) -> Result<Resource, ResourceError> {
        let canonical = self.get(key)?;
        if formatting.is_empty() {
            return Ok(canonical);
        }
        Ok(canonical.formatted(formatting))
    }

    /// Get the canonical resource for `key`, creating it and adding
    /// `translation` for `language` if either is missing.
    ///
    /// A language that already has a translation keeps it; use
    /// [`Resource::add_translation`] to overwrite deliberately.
    pub fn get_or_create(&self, key: &str, translation: &str, language: Language) -> Resource {
        let mut resources = self.resources.write();
        self.create_or_extend(&mut resources, key, translation, language)
            .clone()
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.resources.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.resources.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn entry<'a>(&self, resources: &'a mut HashMap<String, Resource>, key: &str) -> &'a Resource {
        resources.entry(key.to_string()).or_insert_with(|| {
            self.metrics.record_key_created();
            Resource::new(key)
        })
    }

    fn create_or_extend<'a>(
        &self,
        resources: &'a mut HashMap<String, Resource>,
        key: &str,
        translation: &str,
        language: Language,
    ) -> &'a Resource {
        let resource = self.entry(resources, key);
        if resource.add_translation_if_absent(language, translation) {
            self.metrics.record_translation_added();
        } else {
            self.metrics.record_translation_skipped();
        }
        resource
    }

    /// Load every `translations_<code>.properties` file in `dir`.
    ///
    /// A missing directory is not an error: the registry just stays as it
    /// is. Files are processed in name order. A file that fails is recorded
    /// in the report and skipped without touching the registry; the other
    /// files still load.
    ///
    /// # Errors
    /// [`ConfigurationError::UnreadableDirectory`] if `dir` exists but cannot
    /// be listed.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<LoadReport, ConfigurationError> {
        let dir = dir.as_ref();
        let mut report = LoadReport::default();

        if !dir.exists() {
            info!(
                "Translations directory {} not found, starting with an empty registry",
                dir.display()
            );
            return Ok(report);
        }

        let unreadable = |source| ConfigurationError::UnreadableDirectory {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(unreadable)? {
            let path = entry.map_err(unreadable)?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let language = match Language::from_file_name(&path) {
                None => {
                    debug!("Skipping {}: not a translation file", path.display());
                    continue;
                }
                Some(Ok(language)) => language,
                Some(Err(unknown)) => {
                    let error = ConfigurationError::UnknownLanguage {
                        path,
                        name: unknown.0,
                    };
                    warn!("{}", error);
                    self.metrics.record_file_failed();
                    report.failures.push(error);
                    continue;
                }
            };

            match self.load_file(&path, language) {
                Ok(entries) => {
                    report.entries += entries;
                    report.files.push((path, language));
                }
                Err(error) => {
                    warn!("{}", error);
                    report.failures.push(error);
                }
            }
        }

        info!(
            "Loaded {} translation entries from {} files in {} ({} failed)",
            report.entries,
            report.files.len(),
            dir.display(),
            report.failures.len()
        );

        Ok(report)
    }

    /// Load one translation file as `language`.
    ///
    /// The whole file is parsed before anything is registered, so a malformed
    /// file leaves the registry untouched. Entries go through the same
    /// create-or-extend path as [`get_or_create`](Self::get_or_create).
    ///
    /// Returns the number of entries read.
    pub fn load_file(&self, path: &Path, language: Language) -> Result<usize, ConfigurationError> {
        let result = Self::read_entries(path).map(|entries| {
            let mut resources = self.resources.write();
            for (key, value) in &entries {
                self.create_or_extend(&mut resources, key, value, language);
            }
            entries.len()
        });

        match &result {
            Ok(count) => {
                self.metrics.record_file_loaded();
                debug!("Loaded {} entries for {} from {}", count, language, path.display());
            }
            Err(_) => self.metrics.record_file_failed(),
        }

        result
    }

    fn read_entries(path: &Path) -> Result<Vec<(String, String)>, ConfigurationError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;

        properties::parse(&content).map_err(|source| ConfigurationError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every translation against the `base` language translation of
    /// the same key.
    ///
    /// Keys with a `base` translation but none for another language that has
    /// translations elsewhere in the registry get a warning. Keys with no
    /// `base` translation get a warning and are not compared.
    pub fn validate(&self, base: Language) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut resources: Vec<Resource> = self.resources.read().values().cloned().collect();
        resources.sort_by(|a, b| a.key().cmp(b.key()));

        let mut used_languages: Vec<Language> = resources
            .iter()
            .flat_map(|resource| resource.languages())
            .collect();
        used_languages.sort();
        used_languages.dedup();

        for resource in resources {
            let base_template = match resource.template(base) {
                Some(template) => template,
                None => {
                    report.warnings.push(format!(
                        "{}: no {} translation to validate against",
                        resource.key(),
                        base
                    ));
                    continue;
                }
            };

            for &language in used_languages.iter().filter(|&&l| l != base) {
                match resource.template(language) {
                    Some(translated) => report.merge(
                        &format!("{} [{}]", resource.key(), language),
                        TranslationValidator::validate(&base_template, &translated),
                    ),
                    None => report.warnings.push(format!(
                        "{}: missing {} translation",
                        resource.key(),
                        language
                    )),
                }
            }
        }

        report
    }
}

/// String lookup used by the command framework to render replies.
pub trait Localize {
    /// Render `key` in `language` with `formatting`.
    fn localize(
        &self,
        key: &str,
        language: Language,
        formatting: &[FormatArg],
    ) -> Result<String, ResourceError>;

    /// Render `key` in `language`, retrying in `fallback` when `language` has
    /// no translation. Any other error is returned as is.
    fn localize_or(
        &self,
        key: &str,
        language: Language,
        fallback: Language,
        formatting: &[FormatArg],
    ) -> Result<String, ResourceError> {
        match self.localize(key, language, formatting) {
            Err(ResourceError::MissingTranslation { .. }) if fallback != language => {
                self.localize(key, fallback, formatting)
            }
            other => other,
        }
    }
}

impl Localize for ResourceManager {
    fn localize(
        &self,
        key: &str,
        language: Language,
        formatting: &[FormatArg],
    ) -> Result<String, ResourceError> {
        let resource = self.get_formatted(key, formatting.to_vec())?;
        let result = resource.get_translation(language);

        match &result {
            Err(ResourceError::MissingTranslation { .. }) => {
                self.metrics.record_missing_translation()
            }
            Err(ResourceError::Formatting { .. }) => self.metrics.record_formatting_failure(),
            _ => {}
        }

        result
    }
}

impl<T: Localize + ?Sized> Localize for Arc<T> {
    fn localize(
        &self,
        key: &str,
        language: Language,
        formatting: &[FormatArg],
    ) -> Result<String, ResourceError> {
        (**self).localize(key, language, formatting)
    }
}
