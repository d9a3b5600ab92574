//! Request-scoped envelope helpers for handlers.
//!
//! Taking a `Responder` argument gives a handler the request's
//! `Accept-Language` header and the shared translator, so it can answer with
//! `success` / `error` the same way on every route.

use crate::envelope::{EnvelopeBuilder, Reply};
use crate::i18n::Translator;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Responder {
    translator: Arc<Translator>,
    accept_language: Option<String>,
}

impl Responder {
    pub fn new(translator: Arc<Translator>, accept_language: Option<String>) -> Self {
        Self {
            translator,
            accept_language,
        }
    }

    fn builder(&self) -> EnvelopeBuilder<'_> {
        EnvelopeBuilder::new(&self.translator, self.accept_language.as_deref())
    }

    /// Translate a message key into the request's locale.
    pub fn translate(&self, message: &str) -> String {
        self.builder().translate(message)
    }

    /// Successful envelope carrying `data`.
    pub fn success(&self, data: impl Into<Value>) -> Reply {
        self.builder().success(data.into())
    }

    /// Successful envelope with an empty string as `data`.
    pub fn ok(&self) -> Reply {
        self.success("")
    }

    /// Application-level error; see [`EnvelopeBuilder::soft_error`].
    pub fn error(&self, prompt: &str, code: &str) -> Reply {
        self.builder().soft_error(prompt, code)
    }

    /// Application-level error logged as a success; see
    /// [`EnvelopeBuilder::soft_error_reported_as_success`].
    pub fn error_reported_as_success(&self, prompt: &str, code: &str) -> Reply {
        self.builder().soft_error_reported_as_success(prompt, code)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Responder
where
    Arc<Translator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let accept_language = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(Self::new(Arc::<Translator>::from_ref(state), accept_language))
    }
}
