//! Resource registry metrics.
//!
//! Counts lookups, registrations and load outcomes for one
//! [`ResourceManager`](super::ResourceManager).

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for a resource registry.
#[derive(Debug, Default)]
pub struct ResourceMetrics {
    /// Number of key lookups (`get`, `get_formatted`, `localize`)
    lookups: AtomicUsize,

    /// Number of lookups for keys that were never registered
    unknown_keys: AtomicUsize,

    /// Number of keys registered
    keys_created: AtomicUsize,

    /// Number of translations added through the create-or-extend path
    translations_added: AtomicUsize,

    /// Number of translations not added because the language already had one
    translations_skipped: AtomicUsize,

    /// Number of renders that found no template for the language
    missing_translations: AtomicUsize,

    /// Number of renders whose arguments did not fit the template
    formatting_failures: AtomicUsize,

    /// Number of translation files loaded
    files_loaded: AtomicUsize,

    /// Number of translation files that failed to load
    files_failed: AtomicUsize,
}

impl ResourceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unknown_key(&self) {
        self.unknown_keys.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_key_created(&self) {
        self.keys_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translation_added(&self) {
        self.translations_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translation_skipped(&self) {
        self.translations_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing_translation(&self) {
        self.missing_translations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_formatting_failure(&self) {
        self.formatting_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_loaded(&self) {
        self.files_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn unknown_keys(&self) -> usize {
        self.unknown_keys.load(Ordering::Relaxed)
    }

    pub fn keys_created(&self) -> usize {
        self.keys_created.load(Ordering::Relaxed)
    }

    pub fn translations_added(&self) -> usize {
        self.translations_added.load(Ordering::Relaxed)
    }

    pub fn translations_skipped(&self) -> usize {
        self.translations_skipped.load(Ordering::Relaxed)
    }

    pub fn missing_translations(&self) -> usize {
        self.missing_translations.load(Ordering::Relaxed)
    }

    pub fn formatting_failures(&self) -> usize {
        self.formatting_failures.load(Ordering::Relaxed)
    }

    pub fn files_loaded(&self) -> usize {
        self.files_loaded.load(Ordering::Relaxed)
    }

    pub fn files_failed(&self) -> usize {
        self.files_failed.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let lookups = self.lookups();
        let unknown_keys = self.unknown_keys();
        let lookup_hit_rate = if lookups > 0 {
            ((lookups - unknown_keys.min(lookups)) as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookups,
            unknown_keys,
            lookup_hit_rate,
            keys_created: self.keys_created(),
            translations_added: self.translations_added(),
            translations_skipped: self.translations_skipped(),
            missing_translations: self.missing_translations(),
            formatting_failures: self.formatting_failures(),
            files_loaded: self.files_loaded(),
            files_failed: self.files_failed(),
        }
    }
}

/// Snapshot of [`ResourceMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub lookups: usize,
    pub unknown_keys: usize,

    /// Share of lookups that found a registered key, as a percentage (0-100)
    pub lookup_hit_rate: f64,

    pub keys_created: usize,
    pub translations_added: usize,
    pub translations_skipped: usize,
    pub missing_translations: usize,
    pub formatting_failures: usize,
    pub files_loaded: usize,
    pub files_failed: usize,
}
