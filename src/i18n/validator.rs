//! Catalog quality validation.
//!
//! Runs once after the catalog is loaded and reports entries whose
//! translation would break at runtime: positional placeholders (`{0}`, `{1}`)
//! that disappeared or were invented, and empty translations. Findings are
//! logged; they never reject the catalog.

use crate::i18n::CsvCatalog;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Entries that will produce visibly wrong output
    pub errors: Vec<String>,

    /// Entries that are suspicious but usable
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

    fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for catalog entries.
pub struct CatalogValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Validate every plain entry of every locale in the catalog.
    pub fn validate(catalog: &CsvCatalog) -> ValidationReport {
        use crate::i18n::MessageCatalog;

        let mut report = ValidationReport::new();
        for locale in catalog.locales() {
            let mut entries: Vec<(&str, &str)> = catalog.entries(&locale).collect();
            entries.sort();
            for (source, translation) in entries {
                let mut entry_report = Self::validate_entry(source, translation);
                let prefix = |finding: String| format!("{locale}: {finding}");
                entry_report.errors = entry_report.errors.into_iter().map(prefix).collect();
                entry_report.warnings = entry_report.warnings.into_iter().map(prefix).collect();
                report.merge(entry_report);
            }
        }
        report
    }

    /// Validate that one translation keeps the placeholders of its source.
    pub fn validate_entry(source: &str, translation: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if translation.is_empty() && !source.is_empty() {
            report
                .errors
                .push(format!("Empty translation for {:?}", source));
            return report;
        }

        let source_placeholders = Self::extract_placeholders(source);
        let translated_placeholders = Self::extract_placeholders(translation);
        if source_placeholders != translated_placeholders {
            report.warnings.push(format!(
                "Placeholder mismatch for {:?}: source has {:?}, translation has {:?}",
                source, source_placeholders, translated_placeholders
            ));
        }

        report
    }

    /// Extract the distinct positional placeholders from text
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{\d+\}").unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    // ==================== Placeholder Extraction Tests ====================

    #[test]
    fn test_extract_placeholders_single() {
        let placeholders = CatalogValidator::extract_placeholders("你好{0}");
        assert_eq!(placeholders.into_iter().collect::<Vec<_>>(), vec!["{0}"]);
    }

    #[test]
    fn test_extract_placeholders_multiple_and_repeated() {
        let placeholders = CatalogValidator::extract_placeholders("{1} and {0} and {1}");
        assert_eq!(
            placeholders.into_iter().collect::<Vec<_>>(),
            vec!["{0}", "{1}"]
        );
    }

    #[test]
    fn test_extract_placeholders_ignores_named() {
        let placeholders = CatalogValidator::extract_placeholders("Hello {name}");
        assert!(placeholders.is_empty());
    }

    // ==================== Entry Validation Tests ====================

    #[test]
    fn test_validate_entry_clean() {
        let report = CatalogValidator::validate_entry("你好{0}", "Hello {0}");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_entry_reordered_is_clean() {
        let report = CatalogValidator::validate_entry("{0}给{1}", "{1} from {0}");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_entry_missing_placeholder() {
        let report = CatalogValidator::validate_entry("你好{0}", "Hello");
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("Placeholder mismatch"));
    }

    #[test]
    fn test_validate_entry_empty_translation() {
        let report = CatalogValidator::validate_entry("成功", "");
        assert!(report.has_errors());
        assert!(!report.has_warnings());
    }

    // ==================== Catalog Validation Tests ====================

    #[test]
    fn test_validate_catalog_prefixes_locale() {
        let mut catalog = CsvCatalog::new();
        catalog
            .load_locale(
                Locale::parse("en_US").unwrap(),
                "成功,Success\n你好{0},Hello\n".as_bytes(),
            )
            .unwrap();

        let report = CatalogValidator::validate(&catalog);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("en_US: "));
        assert!(!report.has_errors());
    }

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }
}
