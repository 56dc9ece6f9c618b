use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use super::jwt::{JwtAuth, JwtClaims};
use crate::dispatch::{endpoint_of, reject};
use crate::errors::{BusinessError, codes};

/// Read the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, BusinessError> {
    let value = headers.get(AUTHORIZATION).ok_or(codes::REQ_NO_TOKEN)?;
    let value = value.to_str().map_err(|_| codes::WRONG_TOKEN_FORMAT)?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(codes::WRONG_TOKEN_FORMAT),
    }
}

/// JWT authentication middleware.
///
/// Missing header answers 1002, a malformed header 1007, an expired token
/// 1006 and any other verification failure 1005. On success the
/// [`JwtClaims`] are inserted into the request extensions.
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let verified = bearer_token(request.headers())
        .and_then(|token| auth.verify(token).map_err(BusinessError::from));

    match verified {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            let endpoint = endpoint_of(request.extensions(), request.uri());
            tracing::debug!(endpoint = %endpoint, code = err.code, "JWT authentication rejected");
            reject(&endpoint, err)
        }
    }
}

/// Claims of the authenticated caller.
///
/// Only available behind [`jwt_auth_middleware`]; anywhere else extraction
/// answers 1010.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub JwtClaims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<JwtClaims>() {
            Some(claims) => Ok(AuthClaims(claims.clone())),
            None => {
                let endpoint = endpoint_of(&parts.extensions, &parts.uri);
                Err(reject(&endpoint, codes::NOT_AUTHENTICATED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::{
        Router,
        body::Body,
        http::{HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-for-jwt-signing-32chars";

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
    }

    async fn whoami(AuthClaims(claims): AuthClaims) -> String {
        claims.user_id
    }

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route_layer(from_fn_with_state(auth, jwt_auth_middleware))
            .route("/open", get(whoami))
    }

    async fn call(app: Router, path: &str, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().uri(path);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(codes::REQ_NO_TOKEN));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(bearer_token(&headers), Err(codes::WRONG_TOKEN_FORMAT));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), Err(codes::WRONG_TOKEN_FORMAT));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Ok("abc.def"));
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let auth = auth();
        let token = auth.issue("65f1c0ffee0000000000beef").unwrap();

        let (status, body) = call(app(auth), "/me", Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"65f1c0ffee0000000000beef");
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (status, body) = call(app(auth()), "/me", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), json!({"code": 1002, "msg": "No token in request"}));
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let (_, body) = call(app(auth()), "/me", Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(json(&body)["code"], 1007);
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let (_, body) = call(app(auth()), "/me", Some("Bearer garbage")).await;
        assert_eq!(json(&body), json!({"code": 1005, "msg": "Token invalid"}));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let expired = JwtAuth::new(&JwtConfig::new(SECRET).unwrap().with_ttl_secs(-600))
            .issue("user")
            .unwrap();

        let (_, body) = call(app(auth()), "/me", Some(&format!("Bearer {expired}"))).await;
        assert_eq!(json(&body), json!({"code": 1006, "msg": "Token expired"}));
    }

    #[tokio::test]
    async fn test_claims_extractor_outside_middleware() {
        let (status, body) = call(app(auth()), "/open", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["code"], 1010);
    }
}
