use crate::i18n::Locale;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Translations
    pub i18n_dir: PathBuf,
    pub default_locale: Locale,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: match std::env::var("PORT") {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("PORT is not a valid port number: {value}"))?,
                Err(_) => 8080,
            },

            // Translations
            i18n_dir: std::env::var("I18N_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./i18n")),
            default_locale: {
                let code =
                    std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "zh_CN".to_string());
                Locale::parse(&code)
                    .with_context(|| format!("DEFAULT_LOCALE is not a valid locale: {code}"))?
            },
        })
    }
}
