use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{BusinessError, UNKNOWN_CODE};

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    let body = Json(BusinessError::from_static(
        UNKNOWN_CODE,
        "The requested resource was not found",
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}

/// Answer for a known path with an unsupported method.
pub async fn method_not_allowed() -> Response {
    let body = Json(BusinessError::from_static(
        UNKNOWN_CODE,
        "The HTTP method is not allowed for this resource",
    ));

    (StatusCode::METHOD_NOT_ALLOWED, body).into_response()
}
