//! Demo handlers exercising each envelope outcome.

use crate::envelope::Reply;
use crate::error::HandlerError;
use crate::responder::Responder;
use anyhow::anyhow;
use axum::extract::Query;
use serde::Deserialize;

/// Greeting message key.
pub const GREETING: &str = "你好";

/// Greeting message key with a positional name placeholder.
pub const GREETING_TEMPLATE: &str = "你好{0}";

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

impl NameQuery {
    fn name_or_default(self) -> String {
        self.name.unwrap_or_else(|| "World".to_string())
    }
}

/// `GET /hello1`: translated greeting joined with the name.
pub async fn hello1(responder: Responder, Query(query): Query<NameQuery>) -> Reply {
    let greeting = format!("{} {}", responder.translate(GREETING), query.name_or_default());
    responder.success(greeting)
}

/// `GET /hello2`: translated template with the name substituted.
pub async fn hello2(responder: Responder, Query(query): Query<NameQuery>) -> Reply {
    let greeting = responder
        .translate(GREETING_TEMPLATE)
        .replace("{0}", &query.name_or_default());
    responder.success(greeting)
}

/// `GET /error`: always fails with an unclassified error.
pub async fn error() -> Result<Reply, HandlerError> {
    Err(anyhow!("error").into())
}

/// `GET /validate`: requires a non-blank `name`.
pub async fn validate(
    responder: Responder,
    Query(query): Query<NameQuery>,
) -> Result<Reply, HandlerError> {
    match query.name {
        Some(name) if !name.trim().is_empty() => Ok(responder.success(name)),
        _ => Err(HandlerError::validation("name", "required")),
    }
}
