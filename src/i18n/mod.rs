//! Internationalization (i18n) module for localized response messages.
//!
//! Message keys are authored in the default/source locale and translated on
//! the way out. Everything here is built once at start-up and read-only
//! afterwards.
//!
//! # Architecture
//!
//! - `locale`: Normalized `Locale` identifier (`ll` / `ll_RR`)
//! - `registry`: The fixed supported-locale set and the default locale
//! - `catalog`: `MessageCatalog` lookup trait and the CSV directory loader
//! - `resolver`: `Accept-Language` parsing and closest-match resolution
//! - `translator`: Best-effort translation with silent fallback
//! - `validator`: Load-time catalog quality checks
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use localized_envelope::i18n::{CsvCatalog, Locale, Translator};
//!
//! let catalog = CsvCatalog::load_dir("./i18n".as_ref())?;
//! let translator = Translator::new(Locale::parse("zh_CN")?, Arc::new(catalog));
//!
//! let locale = translator.resolve(Some("en-US,en;q=0.9"));
//! let msg = translator.translate(&locale, "成功");
//! ```

mod catalog;
mod locale;
mod registry;
mod resolver;
mod translator;
mod validator;

pub use catalog::{CatalogError, CsvCatalog, MessageCatalog, PluralForm};
pub use locale::Locale;
pub use registry::LocaleRegistry;
pub use resolver::resolve;
pub use translator::Translator;
pub use validator::{CatalogValidator, ValidationReport};
