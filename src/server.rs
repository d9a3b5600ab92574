use crate::config::Config;
use crate::failure::{envelope_boundary, panic_failure};
use crate::handlers;
use crate::i18n::{CatalogValidator, CsvCatalog, Translator};
use anyhow::{Context, Result};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Load the catalog from disk and build the shared translator.
pub fn load_translator(config: &Config) -> Result<Translator> {
    let catalog = CsvCatalog::load_dir(&config.i18n_dir).with_context(|| {
        format!(
            "Failed to load translations from {}",
            config.i18n_dir.display()
        )
    })?;

    let report = CatalogValidator::validate(&catalog);
    for finding in report.errors.iter().chain(report.warnings.iter()) {
        warn!("Translation catalog: {}", finding);
    }

    let translator = Translator::new(config.default_locale.clone(), Arc::new(catalog));

    let supported: Vec<&str> = translator
        .registry()
        .list_all()
        .iter()
        .map(|locale| locale.code())
        .collect();
    info!("Supported locales: {:?}", supported);

    Ok(translator)
}

/// Build the router with every route wrapped in the envelope boundary.
pub fn router(translator: Arc<Translator>) -> Router {
    Router::new()
        .route("/hello1", get(handlers::hello1))
        .route("/hello2", get(handlers::hello2))
        .route("/error", get(handlers::error))
        .route("/validate", get(handlers::validate))
        .with_state(translator.clone())
        .layer(CatchPanicLayer::custom(panic_failure))
        .layer(middleware::from_fn_with_state(translator, envelope_boundary))
        .layer(TraceLayer::new_for_http())
}

/// Bind the listener and serve until Ctrl-C.
pub async fn start(config: Config) -> Result<()> {
    let translator = Arc::new(load_translator(&config)?);
    let app = router(translator);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
