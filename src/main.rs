use anyhow::Result;
use localized_envelope::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("localized_envelope=info".parse()?),
        )
        .init();

    info!("Starting localized envelope server");

    // Load configuration from environment
    let config = config::Config::from_env()?;
    info!(
        "Default locale {}, translations from {}",
        config.default_locale,
        config.i18n_dir.display()
    );

    server::start(config).await
}
