//! Failures raised out of request handlers.
//!
//! Handlers return `Result<Reply, HandlerError>`. The error is never turned
//! into a client-facing body here: `into_response` only tags the response
//! with a [`Failure`] marker, and the boundary middleware in
//! [`crate::failure`] builds the envelope with the request's locale.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, warn};

/// Field name → messages for that field.
pub type FieldMessages = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Input failed schema-level checks; carries per-field detail.
    #[error("request validation failed: {messages:?}")]
    StructuredValidation { messages: FieldMessages },

    /// Anything else.
    #[error("{error:#}")]
    Unclassified {
        error: anyhow::Error,
        stack: Option<String>,
    },
}

impl HandlerError {
    /// A validation failure for a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut messages = FieldMessages::new();
        messages.insert(field.into(), vec![message.into()]);
        Self::StructuredValidation { messages }
    }

    /// Full diagnostic text: error chain followed by the stack backtrace.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::StructuredValidation { messages } => format!("{messages:?}"),
            Self::Unclassified { error, stack } => {
                let mut text = format!("{error:?}");
                if let Some(stack) = stack {
                    text.push_str("\n\nStack backtrace:\n");
                    text.push_str(stack);
                }
                text
            }
        }
    }

    pub fn into_failure(self) -> Failure {
        match self {
            Self::StructuredValidation { messages } => Failure::StructuredValidation(messages),
            unclassified => Failure::Unclassified(unclassified.diagnostic()),
        }
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(error: anyhow::Error) -> Self {
        // anyhow's Debug output already includes its own backtrace when captured
        let stack = match error.backtrace().status() {
            BacktraceStatus::Captured => None,
            _ => Some(Backtrace::force_capture().to_string()),
        };
        Self::Unclassified { error, stack }
    }
}

/// Classified failure carried from a handler (or the framework) to the
/// boundary middleware as a response extension.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    StructuredValidation(FieldMessages),
    Unclassified(String),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match &self {
            Self::StructuredValidation { messages } => {
                warn!("Request validation failed: {:?}", messages);
            }
            Self::Unclassified { error, .. } => {
                error!("Handler failed: {:#}", error);
            }
        }

        self.into_failure().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_validation_helper() {
        let err = HandlerError::validation("name", "required");
        match err.into_failure() {
            Failure::StructuredValidation(messages) => {
                assert_eq!(messages["name"], vec!["required".to_string()]);
            }
            other => panic!("Expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_anyhow_becomes_unclassified() {
        let err: HandlerError = anyhow!("error").into();
        assert!(matches!(err, HandlerError::Unclassified { .. }));
        assert_eq!(err.to_string(), "error");
    }

    #[test]
    fn test_diagnostic_includes_chain_and_stack() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "disk gone",
        ));
        let err: HandlerError = result.context("loading profile").unwrap_err().into();

        let diagnostic = err.diagnostic();
        assert!(diagnostic.contains("loading profile"));
        assert!(diagnostic.contains("disk gone"));
        assert!(diagnostic.contains("backtrace"));
    }

    #[test]
    fn test_into_response_tags_failure() {
        let response = HandlerError::validation("age", "must be positive").into_response();

        let failure = response.extensions().get::<Failure>().unwrap();
        assert!(matches!(failure, Failure::StructuredValidation(_)));
    }

    #[test]
    fn test_unclassified_failure_carries_diagnostic() {
        let err: HandlerError = anyhow!("boom").into();
        match err.into_failure() {
            Failure::Unclassified(diagnostic) => assert!(diagnostic.starts_with("boom")),
            other => panic!("Expected unclassified failure, got {:?}", other),
        }
    }
}
