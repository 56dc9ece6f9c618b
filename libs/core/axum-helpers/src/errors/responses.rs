//! Reusable OpenAPI response types for consistent API documentation.

#[allow(unused_imports)]
use serde_json::json;
use serde::Serialize;
use utoipa::{ToResponse, ToSchema};

/// Documented shape of every JSON answer.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnvelopeBody {
    /// `0` on success, a registry code otherwise
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "success")]
    pub msg: String,
    /// Flattened payload, omitted when every field is empty
    #[schema(nullable = false)]
    pub data: Option<serde_json::Value>,
}

/// Documented shape of a business error body.
#[derive(Debug, Serialize, ToSchema)]
pub struct BusinessErrorBody {
    #[schema(example = 2001)]
    pub code: i32,
    #[schema(example = "User Not Found")]
    pub msg: String,
}

#[derive(ToResponse)]
#[response(
    description = "Business error, answered with HTTP 200",
    content_type = "application/json",
    example = json!({
        "code": 5001,
        "msg": "Invalid Params"
    })
)]
pub struct BusinessErrorResponse(pub BusinessErrorBody);

#[derive(ToResponse)]
#[response(
    description = "Authentication failure, answered with HTTP 200",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "msg": "No token in request"
    })
)]
pub struct AuthErrorResponse(pub BusinessErrorBody);
