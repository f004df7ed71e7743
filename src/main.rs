//! HalpBot console - answers resource lookups typed on stdin.
//!
//! Each line has the form `[@LANG] <key> [args...]`, for example:
//!
//! ```text
//! @ES_ES halpbot.commands.match.object.alias Matr Matrix
//! halpbot.commands.match.tokenexcess
//! ```
//!
//! Arguments that parse as integers, decimals or booleans are passed as such;
//! everything else is a string.
//!
//! Optional environment variables:
//! - TRANSLATIONS_DIR (defaults to translations)
//! - DEFAULT_LANGUAGE (defaults to EN_UK)
//! - FALLBACK_LANGUAGE (defaults to DEFAULT_LANGUAGE)

use anyhow::{Context, Result};
use halpbot_resources::config::Config;
use halpbot_resources::format_args_vec;
use halpbot_resources::i18n::{FormatArg, Language, Localize, ResourceError, ResourceManager};
use halpbot_resources::outcome::Outcome;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const UNKNOWN_KEY: &str = "halpbot.console.unknownkey";
const BAD_ARGUMENTS: &str = "halpbot.console.badarguments";
const UNKNOWN_LANGUAGE: &str = "halpbot.console.unknownlanguage";
const MISSING_KEY: &str = "halpbot.console.missingkey";

/// Built-in replies, used when the translation files don't provide them.
const CONSOLE_DEFAULTS: [(&str, &str); 4] = [
    (UNKNOWN_KEY, "There is no response called %s"),
    (BAD_ARGUMENTS, "The arguments given don't fit the response %s"),
    (UNKNOWN_LANGUAGE, "The language %s isn't supported"),
    (MISSING_KEY, "Expected a response key after the language"),
];

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    language: Language,
    key: String,
    args: Vec<FormatArg>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("halpbot_resources=info".parse()?),
        )
        .init();

    info!("Starting HalpBot resource console");

    let config = Config::from_env()?;

    let (manager, report) = ResourceManager::from_dir(&config.translations_dir)
        .context("Failed to load translations")?;
    for failure in &report.failures {
        warn!("Skipped translation file: {}", failure);
    }

    for (key, template) in CONSOLE_DEFAULTS {
        manager.get_or_create(key, template, Language::EnUk);
    }

    let validation = manager.validate(config.default_language);
    for problem in validation.errors.iter().chain(&validation.warnings) {
        warn!("Translation check: {}", problem);
    }

    info!(
        "Serving {} resources (default {}, fallback {})",
        manager.len(),
        config.default_language,
        config.fallback()
    );

    let manager = Arc::new(manager);
    let mut stdout = tokio::io::stdout();
    serve(
        Arc::clone(&manager),
        &config,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
    )
    .await?;

    info!("Input closed, {} lookups served", manager.metrics().lookups());
    Ok(())
}

/// Answer every line of `input`, each on its own task, writing the replies
/// to `output` in input order.
async fn serve<R, W>(
    manager: Arc<ResourceManager>,
    config: &Config,
    input: R,
    output: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (pending_tx, mut pending_rx) = mpsc::unbounded_channel();

    let read = async move {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            let manager = Arc::clone(&manager);
            let config = config.clone();
            let task = tokio::spawn(async move { respond(&manager, &config, &line) });
            if pending_tx.send(task).is_err() {
                break;
            }
        }
        Ok::<_, anyhow::Error>(())
    };

    let write = async {
        while let Some(task) = pending_rx.recv().await {
            match task.await {
                Ok(Some(reply)) => {
                    output.write_all(reply.as_bytes()).await?;
                    output.write_all(b"\n").await?;
                }
                Ok(None) => {}
                Err(e) => error!("Console task failed: {}", e),
            }
        }
        output.flush().await?;
        Ok::<_, anyhow::Error>(())
    };

    let (read, write) = tokio::join!(read, write);
    read?;
    write
}

/// Resolve one console line into the text to print.
fn respond(manager: &ResourceManager, config: &Config, line: &str) -> Option<String> {
    let fallback = config.fallback();
    let (language, parsed) = parse_line(manager, line, config.default_language);
    if parsed.is_empty() {
        return None;
    }

    match parsed.into_result() {
        Ok(invocation) => Some(reply(manager, &invocation, fallback)),
        Err(Some(reason)) => Some(
            reason
                .get_translation(language)
                .or_else(|_| reason.get_translation(fallback))
                .unwrap_or_else(|e| e.to_string()),
        ),
        Err(None) => None,
    }
}

fn reply(manager: &ResourceManager, invocation: &Invocation, fallback: Language) -> String {
    let rendered = manager.localize_or(
        &invocation.key,
        invocation.language,
        fallback,
        &invocation.args,
    );

    match rendered {
        Ok(text) => text,
        Err(e) => {
            warn!("Lookup of {} failed: {}", invocation.key, e);
            let reason_key = match e {
                ResourceError::UnknownKey { .. } => UNKNOWN_KEY,
                _ => BAD_ARGUMENTS,
            };
            manager
                .localize_or(
                    reason_key,
                    invocation.language,
                    fallback,
                    &format_args_vec![invocation.key.as_str()],
                )
                .unwrap_or_else(|_| e.to_string())
        }
    }
}

/// Split a console line into the language to answer in and an invocation.
///
/// Blank lines are empty outcomes. A bad language tag or a missing key is a
/// failed outcome whose reason is a console resource; the language is the
/// tagged one when the tag parsed, otherwise `default_language`.
fn parse_line(
    manager: &ResourceManager,
    line: &str,
    default_language: Language,
) -> (Language, Outcome<Invocation>) {
    let mut tokens = line.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return (default_language, Outcome::empty());
    }

    let mut language = default_language;
    if let Some(tag) = tokens.peek().copied().and_then(|token| token.strip_prefix('@')) {
        match tag.parse::<Language>() {
            Ok(parsed) => language = parsed,
            Err(_) => {
                let reason = manager
                    .create(UNKNOWN_LANGUAGE)
                    .formatted(format_args_vec![tag]);
                return (default_language, Outcome::failed(reason));
            }
        }
        tokens.next();
    }

    let outcome = match tokens.next() {
        Some(key) => Outcome::of(Invocation {
            language,
            key: key.to_string(),
            args: tokens.map(FormatArg::from_token).collect(),
        }),
        None => Outcome::failed(manager.create(MISSING_KEY)),
    };
    (language, outcome)
}
