//! Turns a handler outcome into its HTTP answer.
//!
//! Every request ends here, so this is also where the one access log line per
//! request is written: endpoint, request, response and error, all as JSON.
//!
//! | Outcome                    | Status | Body                              |
//! |----------------------------|--------|-----------------------------------|
//! | `Ok(resp)`                 | 200    | envelope built from `resp`        |
//! | `Err(AppError::Business)`  | 200    | `{"code": .., "msg": ..}`         |
//! | `Err(AppError::Internal)`  | 500    | error text, `text/plain`          |

use axum::{
    Json,
    extract::MatchedPath,
    http::{Extensions, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use envelope::{Flatten, build_envelope};
use serde::Serialize;

use crate::errors::{AppError, BusinessError};

const NULL: &str = "null";

/// Finish a request.
///
/// `endpoint` identifies the route in logs. `req` is the decoded request
/// body, if the endpoint has one.
pub fn post_process<Req, R>(endpoint: &str, req: Option<&Req>, result: Result<R, AppError>) -> Response
where
    Req: Serialize + ?Sized,
    R: Flatten + Serialize,
{
    let req_json = req.map_or_else(|| NULL.to_string(), to_log_json);
    let resp_json = result.as_ref().ok().map(to_log_json);
    let err_text = result.as_ref().err().map(ToString::to_string);

    tracing::info!(
        endpoint,
        req = %req_json,
        resp = resp_json.as_deref().unwrap_or(NULL),
        err = err_text.as_deref().unwrap_or(NULL),
        "request completed"
    );

    match result {
        Ok(resp) => match build_envelope(Some(&resp)) {
            Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
            Err(err) => error_response(endpoint, err.into()),
        },
        Err(err) => error_response(endpoint, err),
    }
}

/// Answer a request that failed before reaching its handler.
pub fn reject(endpoint: &str, err: BusinessError) -> Response {
    post_process::<(), ()>(endpoint, None, Err(err.into()))
}

/// HTTP answer for a failed request.
pub fn error_response(endpoint: &str, err: AppError) -> Response {
    match err {
        AppError::Business(business) => (StatusCode::OK, Json(business)).into_response(),
        AppError::Internal(report) => {
            tracing::error!(endpoint, error = ?report, "internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                report.to_string(),
            )
                .into_response()
        }
    }
}

/// Route template of the request, or its raw path outside a matched route.
pub fn endpoint_of(extensions: &Extensions, uri: &Uri) -> String {
    extensions
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| uri.path().to_owned())
}

fn to_log_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| format!("<unserializable: {err}>"))
}
