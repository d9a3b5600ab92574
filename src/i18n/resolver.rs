//! Locale resolution from an `Accept-Language` header.
//!
//! Resolution never fails: anything that cannot be matched against the
//! registry resolves to the default locale.

use crate::i18n::{Locale, LocaleRegistry};

/// One parsed `Accept-Language` entry.
#[derive(Debug, Clone, PartialEq)]
struct Preference {
    tag: String,
    weight: f32,
}

/// Pick the supported locale closest to the caller's preferences.
///
/// Entries are tried by descending weight (header order breaks ties). For
/// each entry the exact locale is tried first, then the bare language, then
/// any supported locale with the same language.
pub fn resolve(registry: &LocaleRegistry, header: Option<&str>) -> Locale {
    header
        .map(parse_accept_language)
        .unwrap_or_default()
        .iter()
        .find_map(|preference| closest(registry, &preference.tag))
        .unwrap_or_else(|| registry.default_locale().clone())
}

fn closest(registry: &LocaleRegistry, tag: &str) -> Option<Locale> {
    let locale = Locale::parse(tag).ok()?;

    if registry.is_supported(&locale) {
        return Some(locale);
    }

    if let Some(language) = registry.get_by_code(locale.language()) {
        return Some(language.clone());
    }

    registry.first_with_language(locale.language()).cloned()
}

/// Parse a header into preferences ordered by descending weight.
///
/// Entries with a zero, malformed or out-of-range weight are dropped, as is
/// the `*` wildcard.
fn parse_accept_language(value: &str) -> Vec<Preference> {
    let mut preferences: Vec<Preference> = value
        .split(',')
        .filter_map(|part| {
            let mut components = part.split(';');
            let tag = components.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let mut weight = 1.0;
            for param in components {
                let Some((name, raw)) = param.split_once('=') else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case("q") {
                    weight = raw.trim().parse::<f32>().ok()?;
                }
            }

            if !(weight > 0.0 && weight <= 1.0) {
                return None;
            }

            Some(Preference {
                tag: tag.to_string(),
                weight,
            })
        })
        .collect();

    // sort_by is stable, so equal weights keep header order
    preferences.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    preferences
}
