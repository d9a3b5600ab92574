//! Translator: best-effort message localization.
//!
//! The translator owns the immutable i18n configuration (registry plus
//! catalog) built at start-up. Every request shares one instance by
//! reference; nothing in it changes after construction.

use crate::i18n::{resolver, Locale, LocaleRegistry, MessageCatalog};
use std::sync::Arc;
use tracing::debug;

pub struct Translator {
    registry: LocaleRegistry,
    catalog: Arc<dyn MessageCatalog>,
}

impl Translator {
    /// Build a translator whose supported set is the default locale plus
    /// every locale the catalog holds.
    pub fn new(default_locale: Locale, catalog: Arc<dyn MessageCatalog>) -> Self {
        let registry = LocaleRegistry::new(default_locale, catalog.locales());
        Self { registry, catalog }
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Resolve an `Accept-Language` header value to a supported locale.
    pub fn resolve(&self, accept_language: Option<&str>) -> Locale {
        resolver::resolve(&self.registry, accept_language)
    }

    /// Translate a message key, falling back to the key itself.
    ///
    /// The default locale, a missing entry and a failing catalog all return
    /// `message` unchanged.
    pub fn translate(&self, locale: &Locale, message: &str) -> String {
        if self.registry.is_default(locale) {
            return message.to_string();
        }

        match self.catalog.lookup(locale, message) {
            Ok(Some(translated)) => translated.to_string(),
            Ok(None) => {
                debug!(locale = %locale, "No translation for {:?}", message);
                message.to_string()
            }
            Err(e) => {
                debug!(locale = %locale, error = %e, "Translation lookup failed");
                message.to_string()
            }
        }
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
