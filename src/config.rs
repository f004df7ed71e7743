use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::i18n::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Translations
    pub translations_dir: PathBuf,

    // Languages
    pub default_language: Language,
    pub fallback_language: Option<Language>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            translations_dir: std::env::var("TRANSLATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("translations")),

            default_language: match std::env::var("DEFAULT_LANGUAGE") {
                Ok(code) => parse_language("DEFAULT_LANGUAGE", &code)?,
                Err(_) => Language::default(),
            },
            fallback_language: std::env::var("FALLBACK_LANGUAGE")
                .ok()
                .map(|code| parse_language("FALLBACK_LANGUAGE", &code))
                .transpose()?,
        })
    }

    /// Language to retry in when a reply has no translation for the
    /// requested one.
    pub fn fallback(&self) -> Language {
        self.fallback_language.unwrap_or(self.default_language)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translations_dir: PathBuf::from("translations"),
            default_language: Language::default(),
            fallback_language: None,
        }
    }
}

fn parse_language(var: &str, code: &str) -> Result<Language> {
    code.parse()
        .with_context(|| format!("{} is not a supported language: {}", var, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        env::remove_var("TRANSLATIONS_DIR");
        env::remove_var("DEFAULT_LANGUAGE");
        env::remove_var("FALLBACK_LANGUAGE");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().expect("Defaults should load");
        assert_eq!(config, Config::default());
        assert_eq!(config.translations_dir, PathBuf::from("translations"));
        assert_eq!(config.default_language, Language::EnUk);
        assert_eq!(config.fallback_language, None);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("TRANSLATIONS_DIR", "/srv/halpbot/translations");
        env::set_var("DEFAULT_LANGUAGE", "de_de");
        env::set_var("FALLBACK_LANGUAGE", "EN_US");

        let config = Config::from_env().expect("Overrides should load");
        clear_env();

        assert_eq!(config.translations_dir, PathBuf::from("/srv/halpbot/translations"));
        assert_eq!(config.default_language, Language::DeDe);
        assert_eq!(config.fallback_language, Some(Language::EnUs));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_default_language() {
        clear_env();
        env::set_var("DEFAULT_LANGUAGE", "KLINGON");

        let err = Config::from_env().unwrap_err();
        clear_env();

        assert!(err.to_string().contains("DEFAULT_LANGUAGE"));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_fallback_language() {
        clear_env();
        env::set_var("FALLBACK_LANGUAGE", "EN-GB");

        let err = Config::from_env().unwrap_err();
        clear_env();

        assert!(err.to_string().contains("FALLBACK_LANGUAGE"));
    }

    #[test]
    fn test_fallback_prefers_explicit() {
        let mut config = Config::default();
        assert_eq!(config.fallback(), Language::EnUk);

        config.fallback_language = Some(Language::EsEs);
        assert_eq!(config.fallback(), Language::EsEs);
    }
}
