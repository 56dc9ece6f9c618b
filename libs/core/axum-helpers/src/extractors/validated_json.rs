//! JSON extractor with automatic validation using the validator crate.

use crate::dispatch::{endpoint_of, reject};
use crate::errors::{codes, end_with_code};
use axum::{
    extract::{FromRequest, Json, Request},
    response::Response,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// A body that fails to decode or to validate is answered with business
/// error 5001 ("Invalid Params") before the handler runs. The underlying
/// cause is logged.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct LoginReq {
///     #[validate(email)]
///     email: String,
///     #[validate(length(min = 1))]
///     password: String,
/// }
///
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginReq>) -> Response {
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let endpoint = endpoint_of(req.extensions(), req.uri());

        let Json(data) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            let err = end_with_code(
                rejection.body_text(),
                codes::INVALID_PARAMS.code,
                codes::INVALID_PARAMS.msg,
            );
            reject(&endpoint, err)
        })?;

        data.validate().map_err(|errors| {
            let err = end_with_code(errors, codes::INVALID_PARAMS.code, codes::INVALID_PARAMS.msg);
            reject(&endpoint, err)
        })?;

        Ok(ValidatedJson(data))
    }
}
