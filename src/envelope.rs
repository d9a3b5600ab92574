//! Response envelope: the one JSON shape every response takes.
//!
//! ```json
//! {"success": true, "code": "0", "msg": "成功", "data": ...}
//! ```
//!
//! Builders resolve the request locale and translate `msg` on every call, so
//! a bad `Accept-Language` header only ever changes the message text.

use crate::i18n::Translator;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// `code` of a successful envelope.
pub const SUCCESS_CODE: &str = "0";

/// `code` of an unclassified or validation failure.
pub const FAILURE_CODE: &str = "-1";

/// `code` used by soft errors when the handler does not pick one.
pub const DEFAULT_ERROR_CODE: &str = "0";

/// Message key for successful responses.
pub const SUCCESS_MESSAGE: &str = "成功";

/// Message key for unclassified failures.
pub const REQUEST_FAILED_MESSAGE: &str = "请求接口失败";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub code: String,
    pub msg: String,
    pub data: Value,
}

/// The envelope as recorded for request logging.
///
/// Attached to the response as an extension. It usually equals the body sent
/// to the client but not always; see [`EnvelopeBuilder::soft_error_reported_as_success`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedEnvelope(pub Envelope);

/// A finished response: the envelope written to the client plus the record
/// handed to the logger.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    wire: Envelope,
    reported: Envelope,
}

impl Reply {
    fn same(envelope: Envelope) -> Self {
        Self {
            reported: envelope.clone(),
            wire: envelope,
        }
    }

    /// The envelope serialized into the response body.
    pub fn wire(&self) -> &Envelope {
        &self.wire
    }

    /// The envelope recorded for logging.
    pub fn reported(&self) -> &Envelope {
        &self.reported
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(self.wire)).into_response();
        response
            .extensions_mut()
            .insert(ReportedEnvelope(self.reported));
        response
    }
}

/// Builds envelopes for one request.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeBuilder<'a> {
    translator: &'a Translator,
    accept_language: Option<&'a str>,
}

impl<'a> EnvelopeBuilder<'a> {
    pub fn new(translator: &'a Translator, accept_language: Option<&'a str>) -> Self {
        Self {
            translator,
            accept_language,
        }
    }

    /// Translate a message into the locale the request asked for.
    pub fn translate(&self, message: &str) -> String {
        let locale = self.translator.resolve(self.accept_language);
        self.translator.translate(&locale, message)
    }

    pub fn success(&self, data: Value) -> Reply {
        Reply::same(Envelope {
            success: true,
            code: SUCCESS_CODE.to_string(),
            msg: self.translate(SUCCESS_MESSAGE),
            data,
        })
    }

    /// An application-level error. Client and log both see `success: false`.
    pub fn soft_error(&self, prompt: &str, code: &str) -> Reply {
        Reply::same(self.failure_envelope(prompt, code, json!({})))
    }

    /// An application-level error whose logged record says `success: true`.
    ///
    /// The client still receives `success: false`. Kept separate from
    /// [`soft_error`](Self::soft_error) until it is settled whether these
    /// errors should count as successes in request statistics.
    pub fn soft_error_reported_as_success(&self, prompt: &str, code: &str) -> Reply {
        let wire = self.failure_envelope(prompt, code, json!({}));
        let reported = Envelope {
            success: true,
            ..wire.clone()
        };
        Reply { wire, reported }
    }

    /// A failure raised out of a handler, with an empty `data` object.
    pub fn hard_failure(&self, prompt: &str, code: &str) -> Reply {
        Reply::same(self.failure_envelope(prompt, code, json!({})))
    }

    /// A failure raised out of a handler, carrying diagnostic text in `data`.
    pub fn diagnostic_failure(&self, prompt: &str, code: &str, diagnostic: &str) -> Reply {
        Reply::same(self.failure_envelope(prompt, code, Value::String(diagnostic.to_string())))
    }

    fn failure_envelope(&self, prompt: &str, code: &str, data: Value) -> Envelope {
        Envelope {
            success: false,
            code: code.to_string(),
            msg: self.translate(prompt),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{CsvCatalog, Locale};
    use std::sync::Arc;

    fn translator() -> Translator {
        let mut catalog = CsvCatalog::new();
        catalog
            .load_locale(
                Locale::parse("en_US").unwrap(),
                "成功,Success\n请求接口失败,Request failed\n余额不足,Insufficient balance\n".as_bytes(),
            )
            .unwrap();
        Translator::new(Locale::parse("zh_CN").unwrap(), Arc::new(catalog))
    }

    // ==================== Success Tests ====================

    #[test]
    fn test_success_default_locale() {
        let translator = translator();
        let reply = EnvelopeBuilder::new(&translator, None).success(json!("你好 World"));

        assert_eq!(
            reply.wire(),
            &Envelope {
                success: true,
                code: "0".to_string(),
                msg: "成功".to_string(),
                data: json!("你好 World"),
            }
        );
        assert_eq!(reply.wire(), reply.reported());
    }

    #[test]
    fn test_success_translated() {
        let translator = translator();
        let reply = EnvelopeBuilder::new(&translator, Some("en-US")).success(json!({"id": 1}));

        assert_eq!(reply.wire().msg, "Success");
        assert_eq!(reply.wire().data, json!({"id": 1}));
    }

    #[test]
    fn test_success_serializes_envelope_fields() {
        let translator = translator();
        let reply = EnvelopeBuilder::new(&translator, None).success(json!(""));
        let value = serde_json::to_value(reply.wire()).unwrap();

        assert_eq!(
            value,
            json!({"success": true, "code": "0", "msg": "成功", "data": ""})
        );
    }

    // ==================== Soft Error Tests ====================

    #[test]
    fn test_soft_error() {
        let translator = translator();
        let reply =
            EnvelopeBuilder::new(&translator, Some("en-US")).soft_error("余额不足", "1001");

        assert!(!reply.wire().success);
        assert_eq!(reply.wire().code, "1001");
        assert_eq!(reply.wire().msg, "Insufficient balance");
        assert_eq!(reply.wire().data, json!({}));
        assert_eq!(reply.wire(), reply.reported());
    }

    #[test]
    fn test_soft_error_reported_as_success_diverges() {
        let translator = translator();
        let reply = EnvelopeBuilder::new(&translator, None)
            .soft_error_reported_as_success("余额不足", DEFAULT_ERROR_CODE);

        assert!(!reply.wire().success);
        assert!(reply.reported().success);
        assert_eq!(reply.wire().code, reply.reported().code);
        assert_eq!(reply.wire().msg, reply.reported().msg);
        assert_eq!(reply.wire().data, reply.reported().data);
    }

    #[test]
    fn test_malformed_header_only_changes_message() {
        let translator = translator();
        let reply = EnvelopeBuilder::new(&translator, Some(";;q=oops,,")).soft_error("余额不足", "7");

        assert_eq!(reply.wire().msg, "余额不足");
        assert_eq!(reply.wire().code, "7");
        assert!(!reply.wire().success);
    }

    // ==================== Hard Failure Tests ====================

    #[test]
    fn test_hard_failure_empty_data() {
        let translator = translator();
        let reply = EnvelopeBuilder::new(&translator, None).hard_failure("bad", FAILURE_CODE);

        assert!(!reply.wire().success);
        assert!(!reply.reported().success);
        assert_eq!(reply.wire().code, "-1");
        assert_eq!(reply.wire().data, json!({}));
    }

    #[test]
    fn test_diagnostic_failure_carries_text() {
        let translator = translator();
        let reply = EnvelopeBuilder::new(&translator, Some("en-US")).diagnostic_failure(
            REQUEST_FAILED_MESSAGE,
            FAILURE_CODE,
            "boom",
        );

        assert_eq!(reply.wire().msg, "Request failed");
        assert_eq!(reply.wire().data, json!("boom"));
    }

    // ==================== Response Tests ====================

    #[test]
    fn test_into_response_sets_status_and_extension() {
        let translator = translator();
        let reply = EnvelopeBuilder::new(&translator, None)
            .soft_error_reported_as_success("余额不足", "3");
        let response = reply.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let reported = response.extensions().get::<ReportedEnvelope>().unwrap();
        assert!(reported.0.success);
    }
}
