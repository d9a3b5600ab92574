//! Locale registry: the fixed set of locales the service can answer in.
//!
//! The registry is built once at start-up from the configured default locale
//! and the locales the catalog was able to load. It is immutable afterwards
//! and shared by reference with every request.

use crate::i18n::Locale;
use std::collections::BTreeSet;

/// Supported locales plus the designated default/source locale.
///
/// The default locale is the language raw message keys are written in. It is
/// always a member of the supported set and never needs a catalog entry.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    default: Locale,
    supported: BTreeSet<Locale>,
}

impl LocaleRegistry {
    /// Build a registry from the default locale and any additional locales.
    ///
    /// Duplicates (including a repeat of the default) are collapsed.
    pub fn new(default: Locale, others: impl IntoIterator<Item = Locale>) -> Self {
        let mut supported: BTreeSet<Locale> = others.into_iter().collect();
        supported.insert(default.clone());
        Self { default, supported }
    }

    /// The default/source locale.
    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// Check whether a locale is supported.
    pub fn is_supported(&self, locale: &Locale) -> bool {
        self.supported.contains(locale)
    }

    /// Look up a supported locale by its normalized code.
    ///
    /// # Returns
    /// * `Some(&Locale)` if the code is in the supported set
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&Locale> {
        self.supported.iter().find(|locale| locale.code() == code)
    }

    /// Find the first supported locale that shares the given language.
    ///
    /// Iteration follows code order, so "en" is preferred over "en_GB",
    /// which is preferred over "en_US".
    pub fn first_with_language(&self, language: &str) -> Option<&Locale> {
        self.supported
            .iter()
            .find(|locale| locale.language() == language)
    }

    /// All supported locales, in code order.
    pub fn list_all(&self) -> Vec<&Locale> {
        self.supported.iter().collect()
    }

    /// Check whether a locale is the default/source locale.
    pub fn is_default(&self, locale: &Locale) -> bool {
        &self.default == locale
    }
}
