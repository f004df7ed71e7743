//! Check translations binary - loads a translations directory and reports on it
//!
//! Usage:
//!   cargo run --bin check-translations                     # Check TRANSLATIONS_DIR
//!   cargo run --bin check-translations -- path/to/dir      # Check another directory
//!   cargo run --bin check-translations -- --base ES_ES     # Validate against ES_ES
//!
//! Prints the load report, validation findings and registry metrics as JSON.
//! Exits with status 1 if any file failed to load or any translation has
//! errors.
//!
//! Optional environment variables:
//! - TRANSLATIONS_DIR (defaults to translations)
//! - DEFAULT_LANGUAGE (base language when --base is not given, defaults to EN_UK)

use anyhow::{Context, Result};
use halpbot_resources::config::Config;
use halpbot_resources::i18n::{
    Language, LoadReport, MetricsReport, ResourceManager, ValidationReport,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Serialize)]
struct LoadedFile {
    path: String,
    language: Language,
}

#[derive(Debug, Serialize)]
struct CheckSummary {
    directory: String,
    base_language: Language,
    files: Vec<LoadedFile>,
    entries: usize,
    keys: usize,
    failures: Vec<String>,
    validation: ValidationReport,
    metrics: MetricsReport,
}

impl CheckSummary {
    fn passed(&self) -> bool {
        self.failures.is_empty() && !self.validation.has_errors()
    }
}

/// Command line options: an optional directory and `--base <LANG>`.
#[derive(Debug)]
struct CheckArgs {
    directory: Option<PathBuf>,
    base: Option<Language>,
}

fn parse_args(args: &[String]) -> Result<CheckArgs> {
    let mut directory = None;
    let mut base = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--base" {
            let code = iter.next().context("--base needs a language code")?;
            base = Some(
                code.parse()
                    .with_context(|| format!("--base is not a supported language: {}", code))?,
            );
        } else {
            directory = Some(PathBuf::from(arg));
        }
    }

    Ok(CheckArgs { directory, base })
}

fn summarize(
    directory: PathBuf,
    base_language: Language,
    manager: &ResourceManager,
    report: LoadReport,
) -> CheckSummary {
    CheckSummary {
        directory: directory.display().to_string(),
        base_language,
        files: report
            .files
            .iter()
            .map(|(path, language)| LoadedFile {
                path: path.display().to_string(),
                language: *language,
            })
            .collect(),
        entries: report.entries,
        keys: manager.len(),
        failures: report.failures.iter().map(|e| e.to_string()).collect(),
        validation: manager.validate(base_language),
        metrics: manager.metrics().report(),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("halpbot_resources=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    info!("Loading configuration...");
    let config = Config::from_env()?;
    let directory = args.directory.unwrap_or(config.translations_dir);
    let base_language = args.base.unwrap_or(config.default_language);

    let (manager, report) = ResourceManager::from_dir(&directory)
        .with_context(|| format!("Failed to load {}", directory.display()))?;

    let summary = summarize(directory, base_language, &manager, report);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !summary.passed() {
        info!(
            "Check failed: {} file failures, {} translation errors",
            summary.failures.len(),
            summary.validation.errors.len()
        );
        std::process::exit(1);
    }

    info!("All translations passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_args_empty() {
        let parsed = parse_args(&[]).unwrap();
        assert!(parsed.directory.is_none());
        assert!(parsed.base.is_none());
    }

    #[test]
    fn test_parse_args_directory_and_base() {
        let parsed = parse_args(&args(&["some/dir", "--base", "es_es"])).unwrap();
        assert_eq!(parsed.directory, Some(PathBuf::from("some/dir")));
        assert_eq!(parsed.base, Some(Language::EsEs));
    }

    #[test]
    fn test_parse_args_base_without_value() {
        assert!(parse_args(&args(&["--base"])).is_err());
    }

    #[test]
    fn test_parse_args_unknown_base() {
        let err = parse_args(&args(&["--base", "KLINGON"])).unwrap_err();
        assert!(err.to_string().contains("KLINGON"));
    }

    #[test]
    fn test_summary_fails_on_bad_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("translations_en_uk.properties"), "greeting=Hello\n").unwrap();
        std::fs::write(temp_dir.path().join("translations_xx_yy.properties"), "greeting=???\n").unwrap();

        let (manager, report) = ResourceManager::from_dir(temp_dir.path()).unwrap();
        let summary = summarize(temp_dir.path().to_path_buf(), Language::EnUk, &manager, report);

        assert_eq!(summary.files.len(), 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.keys, 1);
        assert!(!summary.passed());
    }

    #[test]
    fn test_summary_serializes() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("translations_en_uk.properties"), "items=%d items\n").unwrap();
        std::fs::write(temp_dir.path().join("translations_de_de.properties"), "items=%d Artikel\n").unwrap();

        let (manager, report) = ResourceManager::from_dir(temp_dir.path()).unwrap();
        let summary = summarize(temp_dir.path().to_path_buf(), Language::EnUk, &manager, report);
        assert!(summary.passed());

        let json = serde_json::to_string(&summary).expect("Should serialize");
        assert!(json.contains("\"base_language\":\"EN_UK\""));
        assert!(json.contains("\"language\":\"DE_DE\""));
        assert!(json.contains("\"files_loaded\":2"));
    }
}
