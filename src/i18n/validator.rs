//! Translation quality validation module.
//!
//! Checks that a translated template can be rendered with the same arguments
//! as the template it was translated from, and that chat markup the bot
//! relies on (mentions, channel links, custom emoji, URLs) survived the
//! translation.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::format::{self, Placeholder};

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Problems that make the translation fail to render
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Append another report, prefixing each message with `context`.
    pub fn merge(&mut self, context: &str, other: ValidationReport) {
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("{}: {}", context, e)));
        self.warnings
            .extend(other.warnings.into_iter().map(|w| format!("{}: {}", context, w)));
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

// Regex patterns for extraction (cached for performance)
static MENTION_REGEX: OnceLock<Regex> = OnceLock::new();
static CHANNEL_REGEX: OnceLock<Regex> = OnceLock::new();
static EMOJI_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate a translated template against the template it came from.
    ///
    /// Errors:
    /// - either template has a malformed placeholder
    /// - the placeholders consume different arguments or types
    ///
    /// Warnings:
    /// - user and role mentions differ
    /// - channel links differ
    /// - custom emoji differ
    /// - URLs differ
    pub fn validate(base: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        match (format::placeholders(base), format::placeholders(translated)) {
            (Ok(expected), Ok(found)) => {
                if expected != found {
                    report.errors.push(format!(
                        "Placeholder mismatch: base uses {}, translation uses {}",
                        describe(&expected),
                        describe(&found)
                    ));
                }
            }
            (Err(e), _) => report.errors.push(format!("Base template is malformed: {}", e)),
            (_, Err(e)) => report.errors.push(format!("Translation is malformed: {}", e)),
        }

        let base_mentions = Self::extract_mentions(base);
        let trans_mentions = Self::extract_mentions(translated);
        if base_mentions != trans_mentions {
            report.warnings.push(format!(
                "Mention mismatch: base has {:?}, translation has {:?}",
                base_mentions, trans_mentions
            ));
        }

        let base_channels = Self::extract_channels(base);
        let trans_channels = Self::extract_channels(translated);
        if base_channels != trans_channels {
            report.warnings.push(format!(
                "Channel mismatch: base has {:?}, translation has {:?}",
                base_channels, trans_channels
            ));
        }

        let base_emoji = Self::extract_emoji(base);
        let trans_emoji = Self::extract_emoji(translated);
        if base_emoji != trans_emoji {
            report.warnings.push(format!(
                "Emoji mismatch: base has {:?}, translation has {:?}",
                base_emoji, trans_emoji
            ));
        }

        let base_urls = Self::extract_urls(base);
        let trans_urls = Self::extract_urls(translated);
        if base_urls != trans_urls {
            report.warnings.push(format!(
                "URL mismatch: base has {} URLs, translation has {} URLs",
                base_urls.len(),
                trans_urls.len()
            ));
        }

        report
    }

    /// Extract user and role mentions (`<@123>`, `<@!123>`, `<@&123>`)
    fn extract_mentions(text: &str) -> Vec<String> {
        let regex = MENTION_REGEX
            .get_or_init(|| Regex::new(r"<@[!&]?\d+>").expect("mention pattern is valid"));
        sorted_matches(regex, text)
    }

    /// Extract channel links (`<#123>`)
    fn extract_channels(text: &str) -> Vec<String> {
        let regex =
            CHANNEL_REGEX.get_or_init(|| Regex::new(r"<#\d+>").expect("channel pattern is valid"));
        sorted_matches(regex, text)
    }

    /// Extract custom emoji (`<:name:123>`, `<a:name:123>`)
    fn extract_emoji(text: &str) -> Vec<String> {
        let regex = EMOJI_REGEX
            .get_or_init(|| Regex::new(r"<a?:\w+:\d+>").expect("emoji pattern is valid"));
        sorted_matches(regex, text)
    }

    /// Extract all URLs from text
    fn extract_urls(text: &str) -> Vec<String> {
        let regex = URL_REGEX
            .get_or_init(|| Regex::new(r"https?://[^\s)\]>]+").expect("url pattern is valid"));
        sorted_matches(regex, text)
    }
}

/// Word order changes between languages, so compare markup as sorted lists.
fn sorted_matches(regex: &Regex, text: &str) -> Vec<String> {
    let mut found: Vec<String> = regex
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    found.sort();
    found
}

fn describe(placeholders: &[Placeholder]) -> String {
    let parts: Vec<String> = placeholders
        .iter()
        .map(|p| format!("{}:{:?}", p.index, p.conversion))
        .collect();
    format!("[{}]", parts.join(", "))
}
