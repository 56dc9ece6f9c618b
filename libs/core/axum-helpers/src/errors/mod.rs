//! Error taxonomy shared by every endpoint.
//!
//! Failures are either a [`BusinessError`] (a fixed `code`/`msg` pair meant
//! for the user, answered with HTTP 200) or an internal failure carried as an
//! [`eyre::Report`] (answered with a plain-text HTTP 500). [`AppError`] is the
//! tagged union the dispatch layer pattern-matches on.

pub mod codes;
pub mod handlers;
pub mod responses;

use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Code used when an unclassified failure is surfaced as a business error.
pub const UNKNOWN_CODE: i32 = 999;

/// Expected, user-facing failure with a stable numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessError {
    pub code: i32,
    pub msg: Cow<'static, str>,
}

impl BusinessError {
    pub fn new(code: i32, msg: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    /// Registry constructor, usable in `const` items.
    pub const fn from_static(code: i32, msg: &'static str) -> Self {
        Self {
            code,
            msg: Cow::Borrowed(msg),
        }
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code={}, msg={}", self.code, self.msg)
    }
}

impl std::error::Error for BusinessError {}

/// Result of any fallible request step.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Business(#[from] BusinessError),

    #[error("{0}")]
    Internal(eyre::Report),
}

impl AppError {
    pub fn as_business(&self) -> Option<&BusinessError> {
        match self {
            AppError::Business(err) => Some(err),
            AppError::Internal(_) => None,
        }
    }
}

impl From<eyre::Report> for AppError {
    fn from(report: eyre::Report) -> Self {
        AppError::Internal(report)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(eyre::Report::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(eyre::Report::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        crate::dispatch::error_response("-", self)
    }
}

impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        AppError::Business(self).into_response()
    }
}

/// Log `err` and surface it as a business error.
///
/// A business error passes through unchanged; anything else is reported
/// under [`UNKNOWN_CODE`] with its own message.
pub fn end_with_cause(err: impl Into<AppError>) -> BusinessError {
    let err = err.into();
    tracing::error!(error = %err, "ending request with cause");

    match err {
        AppError::Business(business) => business,
        AppError::Internal(report) => BusinessError::new(UNKNOWN_CODE, report.to_string()),
    }
}

/// Log `err` but surface `msg` under [`UNKNOWN_CODE`].
pub fn end_with_message(
    err: impl fmt::Display,
    msg: impl Into<Cow<'static, str>>,
) -> BusinessError {
    tracing::error!(error = %err, "ending request with message");
    BusinessError::new(UNKNOWN_CODE, msg)
}

/// Log `err` but surface the caller's `code` and `msg`.
pub fn end_with_code(
    err: impl fmt::Display,
    code: i32,
    msg: impl Into<Cow<'static, str>>,
) -> BusinessError {
    tracing::error!(error = %err, code, "ending request with code");
    BusinessError::new(code, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_capture::capture;

    #[test]
    fn test_display_format() {
        let err = BusinessError::new(2001, "User Not Found");
        assert_eq!(err.to_string(), "code=2001, msg=User Not Found");
    }

    #[test]
    fn test_serializes_as_code_and_msg() {
        let value = serde_json::to_value(codes::INVALID_PARAMS).unwrap();
        assert_eq!(value, serde_json::json!({"code": 5001, "msg": "Invalid Params"}));
    }

    #[test]
    fn test_end_with_cause_keeps_business_error() {
        let surfaced = end_with_cause(codes::USER_NOT_FOUND);
        assert_eq!(surfaced, codes::USER_NOT_FOUND);
    }

    #[test]
    fn test_end_with_cause_wraps_unknown_error() {
        let surfaced = end_with_cause(eyre::eyre!("connection reset"));
        assert_eq!(surfaced.code, UNKNOWN_CODE);
        assert_eq!(surfaced.msg, "connection reset");
    }

    #[test]
    fn test_end_with_message_discards_original_text() {
        let surfaced = end_with_message("socket closed", "please retry later");
        assert_eq!(surfaced, BusinessError::new(UNKNOWN_CODE, "please retry later"));
    }

    #[test]
    fn test_end_with_code_uses_caller_code() {
        let surfaced = end_with_code(
            "input contains invalid characters",
            codes::INVALID_BIRTHDAY.code,
            codes::INVALID_BIRTHDAY.msg.clone(),
        );
        assert_eq!(surfaced, codes::INVALID_BIRTHDAY);
    }

    #[test]
    fn test_end_helpers_always_log_the_cause() {
        let (surfaced, logs) = capture(|| {
            end_with_code("premature end of input", 5005, "Invalid birthday format");
            end_with_message("socket closed", "please retry later");
            end_with_cause(codes::USER_NOT_FOUND)
        });
        assert_eq!(surfaced, codes::USER_NOT_FOUND);

        let with_code = logs.find("ERROR", "ending request with code");
        assert_eq!(with_code.len(), 1);
        assert_eq!(with_code[0]["error"], "premature end of input");
        assert_eq!(with_code[0]["code"], 5005);

        let with_message = logs.find("ERROR", "ending request with message");
        assert_eq!(with_message.len(), 1);
        assert_eq!(with_message[0]["error"], "socket closed");

        let with_cause = logs.find("ERROR", "ending request with cause");
        assert_eq!(with_cause.len(), 1);
        assert_eq!(with_cause[0]["error"], codes::USER_NOT_FOUND.to_string());
    }

    #[test]
    fn test_app_error_classification() {
        let business: AppError = codes::TOKEN_EXPIRED.into();
        assert_eq!(business.as_business(), Some(&codes::TOKEN_EXPIRED));

        let internal: AppError = std::io::Error::other("disk full").into();
        assert!(internal.as_business().is_none());
        assert_eq!(internal.to_string(), "disk full");
    }
}
