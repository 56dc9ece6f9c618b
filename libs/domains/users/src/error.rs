use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, BusinessError, codes};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("email already exists: {0}")]
    EmailExists(String),

    #[error("username or password incorrect")]
    InvalidCredentials,

    #[error("wrong password")]
    WrongPassword,

    #[error("new password equals the old one")]
    PasswordUnchanged,

    #[error("confirm password does not match the new password")]
    PasswordConfirmMismatch,

    #[error("confirmation text does not match")]
    ConfirmationMismatch,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid object id: {0}")]
    InvalidId(String),

    #[error("Token carries an unusable user id: {0}")]
    InvalidActor(String),

    #[error("User {0} is not an admin")]
    NotAdmin(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Already classified by the caller, passed through untouched.
    #[error(transparent)]
    Business(#[from] BusinessError),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<mongodb::bson::ser::Error> for UserError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        UserError::Serialization(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for UserError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        UserError::Serialization(err.to_string())
    }
}

/// Business failures keep their registry code; storage and hashing failures
/// become internal errors.
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let business = match err {
            UserError::EmailExists(_) => codes::EMAIL_ALREADY_EXISTS,
            UserError::InvalidCredentials => codes::INVALID_CREDENTIALS,
            UserError::WrongPassword => codes::WRONG_PASSWORD,
            UserError::PasswordUnchanged => codes::PASSWORD_UNCHANGED,
            UserError::PasswordConfirmMismatch => codes::PASSWORD_CONFIRM_MISMATCH,
            UserError::ConfirmationMismatch => codes::CONFIRMATION_MISMATCH,
            UserError::NotFound(_) => codes::USER_NOT_FOUND,
            UserError::InvalidId(_) => codes::INVALID_OBJECT_ID,
            UserError::InvalidActor(_) => codes::GET_USER_ID_FAILED,
            UserError::NotAdmin(_) => codes::USER_NOT_ADMIN,
            UserError::Validation(_) => codes::INVALID_PARAMS,
            UserError::Business(business) => business,
            UserError::Database(err) => return AppError::Internal(eyre::Report::new(err)),
            UserError::Serialization(msg) | UserError::PasswordHash(msg) => {
                return AppError::Internal(eyre::eyre!(msg));
            }
        };

        AppError::Business(business)
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_variants_keep_registry_codes() {
        let cases = [
            (UserError::EmailExists("a@x.com".into()), 3006),
            (UserError::InvalidCredentials, 1012),
            (UserError::WrongPassword, 10001),
            (UserError::PasswordUnchanged, 10002),
            (UserError::PasswordConfirmMismatch, 10003),
            (UserError::ConfirmationMismatch, 10004),
            (UserError::NotFound("x".into()), 2001),
            (UserError::InvalidId("x".into()), 2006),
            (UserError::InvalidActor("x".into()), 1008),
            (UserError::NotAdmin("x".into()), 1011),
            (UserError::Validation("x".into()), 5001),
            (UserError::Business(codes::INVALID_BIRTHDAY), 5005),
        ];

        for (err, code) in cases {
            let app: AppError = err.into();
            assert_eq!(app.as_business().map(|b| b.code), Some(code));
        }
    }

    #[test]
    fn test_hash_failure_is_internal() {
        let app: AppError = UserError::PasswordHash("salt too short".into()).into();
        assert!(app.as_business().is_none());
        assert_eq!(app.to_string(), "salt too short");
    }
}
