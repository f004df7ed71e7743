//! Internationalization (i18n) module for localized bot responses.
//!
//! Every user-facing string the bot sends is a [`Resource`]: a key with one
//! template per [`Language`]. Templates live in `translations_<code>.properties`
//! files that the [`ResourceManager`] loads at startup.
//!
//! # Architecture
//!
//! - `language`: Closed set of supported locales and their formatting rules
//! - `resource`: Translatable string handle, optionally carrying arguments
//! - `manager`: Registry of canonical resources and the translation loader
//! - `format`: printf-style template rendering
//! - `properties`: Translation file parser
//! - `validator`: Cross-language template checks
//! - `metrics`: Registry counters
//!
//! # Example
//!
//! ```rust,ignore
//! use halpbot_resources::i18n::{Language, Localize, ResourceManager};
//!
//! let (manager, _report) = ResourceManager::from_dir("translations")?;
//! let resource = manager.get_or_create("greeting", "Hello %s", Language::EnUk);
//! let text = manager.localize("greeting", Language::EnUk, &format_args_vec!["Ana"])?;
//! ```

mod error;
pub mod format;
mod language;
mod manager;
mod metrics;
pub mod properties;
mod resource;
mod validator;

pub use error::{ConfigurationError, ResourceError};
pub use format::{FormatArg, FormatError};
pub use language::{Language, UnknownLanguage};
pub use manager::{LoadReport, Localize, ResourceManager};
pub use metrics::{MetricsReport, ResourceMetrics};
pub use properties::PropertiesError;
pub use resource::Resource;
pub use validator::{TranslationValidator, ValidationReport};
