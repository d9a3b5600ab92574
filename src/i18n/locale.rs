//! Locale type: normalized language identifier.
//!
//! Language tags arrive in several spellings (`en-US`, `en_us`, `EN`). This
//! module folds them into one canonical form, `ll` or `ll_RR`, so that
//! catalog file names, header values and configuration all compare equal.

use anyhow::{bail, Result};
use std::fmt;

/// A normalized locale identifier.
///
/// The language part is lowercase and the optional region part is uppercase,
/// joined by an underscore (e.g. "zh_CN", "en_US", "fr").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    code: String,
}

impl Locale {
    /// Parse and normalize a language tag.
    ///
    /// Accepts `-` or `_` as separator and any letter case. At most two
    /// parts are allowed, each made of ASCII letters only.
    ///
    /// # Returns
    /// * `Ok(Locale)` with the normalized code
    /// * `Err` if the tag is empty, has more than two parts, or contains
    ///   characters other than ASCII letters
    pub fn parse(tag: &str) -> Result<Locale> {
        let tag = tag.trim();
        let normalized = tag.replace('-', "_");
        let parts: Vec<&str> = normalized.split('_').collect();

        if parts.len() > 2 {
            bail!("Locale '{}' has too many parts", tag);
        }
        if parts
            .iter()
            .any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_alphabetic()))
        {
            bail!("Locale '{}' is not a valid language tag", tag);
        }

        let code = match parts.as_slice() {
            [language] => language.to_ascii_lowercase(),
            [language, region] => format!(
                "{}_{}",
                language.to_ascii_lowercase(),
                region.to_ascii_uppercase()
            ),
            _ => bail!("Locale '{}' is not a valid language tag", tag),
        };

        Ok(Locale { code })
    }

    /// The normalized code (e.g. "en_US").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The language part (e.g. "en" for "en_US").
    pub fn language(&self) -> &str {
        self.code.split('_').next().unwrap_or(&self.code)
    }

    /// The region part, if any (e.g. "US" for "en_US").
    pub fn region(&self) -> Option<&str> {
        self.code.split_once('_').map(|(_, region)| region)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Normalization Tests ====================

    #[test]
    fn test_parse_language_only() {
        let locale = Locale::parse("EN").expect("Should succeed");
        assert_eq!(locale.code(), "en");
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.region(), None);
    }

    #[test]
    fn test_parse_hyphenated_tag() {
        let locale = Locale::parse("en-us").expect("Should succeed");
        assert_eq!(locale.code(), "en_US");
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.region(), Some("US"));
    }

    #[test]
    fn test_parse_underscored_tag() {
        let locale = Locale::parse("zh_cn").expect("Should succeed");
        assert_eq!(locale.code(), "zh_CN");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let locale = Locale::parse("  fr-FR ").expect("Should succeed");
        assert_eq!(locale.code(), "fr_FR");
    }

    // ==================== Rejection Tests ====================

    #[test]
    fn test_parse_empty() {
        assert!(Locale::parse("").is_err());
    }

    #[test]
    fn test_parse_too_many_parts() {
        let result = Locale::parse("zh-Hant-TW");
        assert!(result.unwrap_err().to_string().contains("too many parts"));
    }

    #[test]
    fn test_parse_non_alphabetic() {
        assert!(Locale::parse("es-419").is_err());
        assert!(Locale::parse("en;q=0.5").is_err());
        assert!(Locale::parse("*").is_err());
    }

    #[test]
    fn test_parse_dangling_separator() {
        assert!(Locale::parse("en-").is_err());
        assert!(Locale::parse("_US").is_err());
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_equality_across_spellings() {
        assert_eq!(
            Locale::parse("en-US").unwrap(),
            Locale::parse("EN_us").unwrap()
        );
    }

    #[test]
    fn test_display() {
        let locale = Locale::parse("pt-br").unwrap();
        assert_eq!(locale.to_string(), "pt_BR");
    }
}
