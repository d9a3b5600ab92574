//! Translation catalog: (locale, message key) → localized string.
//!
//! `MessageCatalog` is the lookup seam the translator depends on. `CsvCatalog`
//! is the implementation used by the server: one `<locale>.csv` file per
//! locale, each row `source,translation[,plural]`.

use crate::i18n::Locale;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog directory {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read access to a loaded catalog.
///
/// `Ok(None)` means "no entry" and is an ordinary outcome. `Err` is reserved
/// for a catalog that cannot answer at all.
pub trait MessageCatalog: Send + Sync {
    fn lookup(&self, locale: &Locale, key: &str) -> Result<Option<&str>, CatalogError>;

    /// Locales for which the catalog holds entries.
    fn locales(&self) -> Vec<Locale>;
}

/// Plural indicator from the optional third CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralForm {
    Singular,
    Plural,
    Unknown,
}

impl PluralForm {
    fn from_column(value: Option<&str>) -> Option<PluralForm> {
        match value.unwrap_or("") {
            "" | "unknown" => Some(PluralForm::Unknown),
            "singular" => Some(PluralForm::Singular),
            "plural" => Some(PluralForm::Plural),
            _ => None,
        }
    }
}

type Messages = HashMap<String, String>;

/// Catalog backed by a directory of CSV files.
#[derive(Debug, Default)]
pub struct CsvCatalog {
    entries: HashMap<Locale, HashMap<PluralForm, Messages>>,
}

impl CsvCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<locale>.csv` file in `dir`.
    ///
    /// A missing directory produces an empty catalog. Files whose stem is not
    /// a normalized locale name (`en_US`, `fr`) are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        if !dir.is_dir() {
            warn!(
                "Translation directory {} not found, serving default locale only",
                dir.display()
            );
            return Ok(catalog);
        }

        let io_error = |source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(io_error)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io_error)?;
        paths.sort();

        for path in paths {
            if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                warn!("Skipping translation file with non UTF-8 name: {}", path.display());
                continue;
            };

            let locale = match Locale::parse(stem) {
                Ok(locale) if locale.code() == stem => locale,
                _ => {
                    warn!(
                        "Unrecognized locale {:?} (path: {})",
                        stem,
                        path.display()
                    );
                    continue;
                }
            };

            let file = std::fs::File::open(&path).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })?;
            let count = catalog
                .load_locale(locale.clone(), file)
                .map_err(|source| CatalogError::Csv {
                    path: path.clone(),
                    source,
                })?;

            info!("Loaded {} translations for {}", count, locale);
        }

        Ok(catalog)
    }

    /// Load CSV rows for one locale, merging into any existing entries.
    ///
    /// # Returns
    /// The number of rows accepted.
    pub fn load_locale<R: Read>(&mut self, locale: Locale, reader: R) -> Result<usize, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let forms = self.entries.entry(locale.clone()).or_default();
        let mut accepted = 0;

        for (line, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() < 2 {
                continue;
            }

            let Some(form) = PluralForm::from_column(record.get(2)) else {
                warn!(
                    "Unrecognized plural indicator {:?} in {} line {}",
                    record.get(2).unwrap_or(""),
                    locale,
                    line + 1
                );
                continue;
            };

            let source = record[0].trim_start_matches('\u{feff}').to_string();
            let translation = record[1].to_string();
            forms.entry(form).or_default().insert(source, translation);
            accepted += 1;
        }

        Ok(accepted)
    }

    /// Iterate the plain (non-plural) entries for a locale as (source, translation).
    pub fn entries<'a>(&'a self, locale: &Locale) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries
            .get(locale)
            .and_then(|forms| forms.get(&PluralForm::Unknown))
            .into_iter()
            .flat_map(|messages| messages.iter())
            .map(|(source, translation)| (source.as_str(), translation.as_str()))
    }
}

impl MessageCatalog for CsvCatalog {
    fn lookup(&self, locale: &Locale, key: &str) -> Result<Option<&str>, CatalogError> {
        Ok(self
            .entries
            .get(locale)
            .and_then(|forms| forms.get(&PluralForm::Unknown))
            .and_then(|messages| messages.get(key))
            .map(String::as_str))
    }

    fn locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self.entries.keys().cloned().collect();
        locales.sort();
        locales
    }
}
