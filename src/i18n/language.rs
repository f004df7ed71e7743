//! Language type: the closed set of locales the bot can answer in.
//!
//! Languages are used as translation-map keys and to pick locale rules when
//! rendering numbers and dates. The external code form (`"EN_UK"`) is what
//! translation file names and environment variables use.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix every translation file name starts with.
const FILE_PREFIX: &str = "translations_";

/// Extension of translation files.
const FILE_EXTENSION: &str = "properties";

/// A supported locale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Language {
    /// English (United Kingdom). The default language.
    #[default]
    #[serde(rename = "EN_UK")]
    EnUk,

    /// English (United States)
    #[serde(rename = "EN_US")]
    EnUs,

    /// Spanish (Spain)
    #[serde(rename = "ES_ES")]
    EsEs,

    /// French (France)
    #[serde(rename = "FR_FR")]
    FrFr,

    /// German (Germany)
    #[serde(rename = "DE_DE")]
    DeDe,
}

/// Returned when a string does not name a supported language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown language code: '{0}'")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Every supported language, in declaration order.
    pub const ALL: [Language; 5] = [
        Language::EnUk,
        Language::EnUs,
        Language::EsEs,
        Language::FrFr,
        Language::DeDe,
    ];

    /// The external code of the language (e.g., "EN_UK").
    pub fn code(&self) -> &'static str {
        match self {
            Language::EnUk => "EN_UK",
            Language::EnUs => "EN_US",
            Language::EsEs => "ES_ES",
            Language::FrFr => "FR_FR",
            Language::DeDe => "DE_DE",
        }
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::EnUk => "English (United Kingdom)",
            Language::EnUs => "English (United States)",
            Language::EsEs => "Spanish",
            Language::FrFr => "French",
            Language::DeDe => "German",
        }
    }

    /// Parse a language code.
    ///
    /// The code is upper-cased (underscores are kept as they are) and then
    /// matched exactly against [`Language::code`], so `"en_uk"` and `"EN_UK"`
    /// both resolve to [`Language::EnUk`] while `"en-uk"` does not.
    pub fn from_code(code: &str) -> Result<Language, UnknownLanguage> {
        let normalized = code.trim().to_uppercase();
        Language::ALL
            .into_iter()
            .find(|language| language.code() == normalized)
            .ok_or_else(|| UnknownLanguage(code.to_string()))
    }

    /// Work out which language a translation file holds.
    ///
    /// # Returns
    /// * `None` if the file name is not of the form `translations_<code>.properties`
    /// * `Some(Ok(language))` for a recognised language suffix
    /// * `Some(Err(_))` when the file follows the pattern but names no known language
    pub fn from_file_name(path: &Path) -> Option<Result<Language, UnknownLanguage>> {
        let extension = path.extension()?.to_str()?;
        if extension != FILE_EXTENSION {
            return None;
        }

        let stem = path.file_stem()?.to_str()?;
        let suffix = stem.strip_prefix(FILE_PREFIX)?;
        Some(Language::from_code(suffix))
    }

    /// Character placed between the integer and fractional digits.
    pub fn decimal_separator(&self) -> char {
        match self {
            Language::EnUk | Language::EnUs => '.',
            Language::EsEs | Language::FrFr | Language::DeDe => ',',
        }
    }

    /// Character placed between groups of three integer digits.
    pub fn grouping_separator(&self) -> char {
        match self {
            Language::EnUk | Language::EnUs => ',',
            Language::EsEs | Language::DeDe => '.',
            // Narrow no-break space
            Language::FrFr => '\u{202f}',
        }
    }

    /// `chrono` pattern used when a date-time argument is rendered with `%s`.
    pub fn date_time_pattern(&self) -> &'static str {
        match self {
            Language::EnUk | Language::EsEs | Language::FrFr => "%d/%m/%Y %H:%M",
            Language::EnUs => "%m/%d/%Y %I:%M %p",
            Language::DeDe => "%d.%m.%Y %H:%M",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}
