//! Failure translation at the request boundary.
//!
//! `envelope_boundary` wraps the whole router. Whatever comes back from the
//! inner service (a handler [`Reply`], a tagged [`Failure`], a framework
//! response such as a 404, or a caught panic) leaves as exactly one
//! [`Envelope`](crate::envelope::Envelope) with status 200.

use crate::envelope::{
    EnvelopeBuilder, Reply, ReportedEnvelope, FAILURE_CODE, REQUEST_FAILED_MESSAGE,
};
use crate::error::{Failure, FieldMessages};
use crate::i18n::Translator;
use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header::ACCEPT_LANGUAGE, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::any::Any;
use std::backtrace::Backtrace;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Upper bound on how much of a framework response body is kept as diagnostic.
const FRAMEWORK_BODY_LIMIT: usize = 64 * 1024;

/// Build the envelope for a classified failure.
pub fn translate_failure(builder: &EnvelopeBuilder<'_>, failure: &Failure) -> Reply {
    match failure {
        Failure::StructuredValidation(messages) => {
            builder.hard_failure(&validation_prompt(messages), FAILURE_CODE)
        }
        Failure::Unclassified(diagnostic) => {
            builder.diagnostic_failure(REQUEST_FAILED_MESSAGE, FAILURE_CODE, diagnostic)
        }
    }
}

/// Serialize field messages into the catalog key used as the prompt.
///
/// Existing catalogs were keyed by Python's `json.dumps`, so the output uses
/// its default layout: `", "` and `": "` separators, non-ASCII as `\uXXXX`.
pub fn validation_prompt(messages: &FieldMessages) -> String {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PythonJsonFormatter);
    if messages.serialize(&mut serializer).is_err() {
        return format!("{messages:?}");
    }
    String::from_utf8(buf).unwrap_or_else(|_| format!("{messages:?}"))
}

struct PythonJsonFormatter;

impl Formatter for PythonJsonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Middleware that guarantees every response is an envelope.
///
/// Also acts as the request logger: the reported record of the final
/// envelope is logged and left on the response as a [`ReportedEnvelope`].
pub async fn envelope_boundary(
    State(translator): State<Arc<Translator>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = next.run(request).await;

    let builder = EnvelopeBuilder::new(&translator, accept_language.as_deref());
    let response = finalize(&builder, response).await;

    if let Some(ReportedEnvelope(reported)) = response.extensions().get::<ReportedEnvelope>() {
        info!(
            method = %method,
            path = %path,
            success = reported.success,
            code = %reported.code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
    }

    response
}

async fn finalize(builder: &EnvelopeBuilder<'_>, mut response: Response) -> Response {
    if response.extensions().get::<ReportedEnvelope>().is_some() {
        // Envelopes always travel with 200, whatever status the handler paired them with.
        *response.status_mut() = StatusCode::OK;
        return response;
    }

    let tagged = response.extensions().get::<Failure>().cloned();
    let failure = match tagged {
        Some(failure) => failure,
        None => framework_failure(response).await,
    };

    translate_failure(builder, &failure).into_response()
}

/// Classify a response the framework produced on its own (unknown route,
/// wrong method, extractor rejection).
async fn framework_failure(response: Response) -> Failure {
    let (parts, body) = response.into_parts();
    let body = to_bytes(body, FRAMEWORK_BODY_LIMIT)
        .await
        .unwrap_or_default();
    let body = String::from_utf8_lossy(&body);

    let diagnostic = if body.trim().is_empty() {
        parts.status.to_string()
    } else {
        format!("{}: {}", parts.status, body.trim())
    };

    Failure::Unclassified(diagnostic)
}

/// Panic handler for `CatchPanicLayer`.
pub fn panic_failure(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    error!("Handler panicked: {}", message);

    Failure::Unclassified(format!(
        "panicked: {}\n\nStack backtrace:\n{}",
        message,
        Backtrace::force_capture()
    ))
    .into_response()
}
