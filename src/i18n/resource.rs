//! Resource: a translatable message identified by key.
//!
//! A resource carries a handle to its key's translation map and, optionally,
//! positional formatting arguments. Every resource for the same key that came
//! out of the same [`ResourceManager`](super::ResourceManager) shares one map,
//! so a translation added through any of them is visible through all of them.
//! Formatting arguments belong to the individual handle.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;

use super::format::{self, FormatArg};
use super::{Language, ResourceError};

/// Shared language → template map of one key.
pub(crate) type Translations = Arc<RwLock<HashMap<Language, String>>>;

/// A translatable string.
///
/// Equality and hashing only look at the key: a formatted view and its
/// canonical resource are the same resource as far as sets and maps care.
#[derive(Clone)]
pub struct Resource {
    key: Arc<str>,
    formatting: Vec<FormatArg>,
    translations: Translations,
}

impl Resource {
    /// Build a resource with no translations.
    ///
    /// The resource is not registered anywhere; hand it to
    /// [`ResourceManager::register`](super::ResourceManager::register) to make
    /// it the canonical resource for its key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Arc::from(key.into()),
            formatting: Vec::new(),
            translations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Builder form of [`add_translation`](Self::add_translation).
    pub fn with_translation(self, language: Language, translation: impl Into<String>) -> Self {
        self.add_translation(language, translation);
        self
    }

    pub(crate) fn from_parts(key: Arc<str>, translations: Translations) -> Self {
        Self {
            key,
            formatting: Vec::new(),
            translations,
        }
    }

    pub(crate) fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Formatting arguments applied by [`get_translation`](Self::get_translation).
    pub fn formatting(&self) -> &[FormatArg] {
        &self.formatting
    }

    /// A view of this resource carrying `formatting`.
    ///
    /// The view shares the translation map; nothing is copied.
    pub fn formatted(&self, formatting: Vec<FormatArg>) -> Self {
        Self {
            key: Arc::clone(&self.key),
            formatting,
            translations: Arc::clone(&self.translations),
        }
    }

    /// Set the template for `language`, replacing any existing one.
    pub fn add_translation(&self, language: Language, translation: impl Into<String>) -> &Self {
        self.translations.write().insert(language, translation.into());
        self
    }

    /// Set several templates at once, replacing existing ones.
    pub fn add_translations<I, S>(&self, translations: I) -> &Self
    where
        I: IntoIterator<Item = (Language, S)>,
        S: Into<String>,
    {
        let mut map = self.translations.write();
        for (language, translation) in translations {
            map.insert(language, translation.into());
        }
        drop(map);
        self
    }

    /// Set the template for `language` only if it has none.
    ///
    /// Returns `true` if the translation was inserted.
    pub(crate) fn add_translation_if_absent(&self, language: Language, translation: &str) -> bool {
        let mut map = self.translations.write();
        if map.contains_key(&language) {
            return false;
        }
        map.insert(language, translation.to_string());
        true
    }

    pub fn has_translation(&self, language: Language) -> bool {
        self.translations.read().contains_key(&language)
    }

    /// Languages this resource has a template for, in [`Language`] order.
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<_> = self.translations.read().keys().copied().collect();
        languages.sort();
        languages
    }

    /// The raw template for `language`, without applying formatting.
    pub fn template(&self, language: Language) -> Option<String> {
        self.translations.read().get(&language).cloned()
    }

    /// Render this resource in `language`.
    ///
    /// Without formatting arguments the template is returned as written.
    ///
    /// # Errors
    /// * [`ResourceError::MissingTranslation`] if there is no template for `language`
    /// * [`ResourceError::Formatting`] if the arguments don't fit the template
    pub fn get_translation(&self, language: Language) -> Result<String, ResourceError> {
        let template = self
            .template(language)
            .ok_or_else(|| ResourceError::MissingTranslation {
                key: self.key.to_string(),
                language,
            })?;

        if self.formatting.is_empty() {
            return Ok(template);
        }

        format::format(&template, &self.formatting, language).map_err(|source| {
            ResourceError::Formatting {
                key: self.key.to_string(),
                language,
                source,
            }
        })
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("key", &self.key)
            .field("formatting", &self.formatting)
            .field("languages", &self.languages())
            .finish()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
