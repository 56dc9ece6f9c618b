//! Registry of business error codes.
//!
//! Codes are grouped by namespace and never reused:
//!
//! | Range       | Namespace                 |
//! |-------------|---------------------------|
//! | 1001-1012   | authentication            |
//! | 2001-2007   | persistence               |
//! | 3006        | email                     |
//! | 5001-5005   | request parameters        |
//! | 10001-10004 | account maintenance       |
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::codes;
//!
//! assert_eq!(codes::USER_NOT_FOUND.code, 2001);
//! assert_eq!(codes::USER_NOT_FOUND.msg, "User Not Found");
//! ```

use super::BusinessError;

// Authentication (1000s)
pub const TOKEN_CREATION_FAILED: BusinessError =
    BusinessError::from_static(1001, "AuthToken creation failed");
pub const REQ_NO_TOKEN: BusinessError = BusinessError::from_static(1002, "No token in request");
pub const TOKEN_UNINITIALIZED: BusinessError =
    BusinessError::from_static(1003, "Token uninitialized");
pub const AUTH_TOKEN_CREATION_FAILED: BusinessError =
    BusinessError::from_static(1004, "Auth token creation failed");
pub const TOKEN_INVALID: BusinessError = BusinessError::from_static(1005, "Token invalid");
pub const TOKEN_EXPIRED: BusinessError = BusinessError::from_static(1006, "Token expired");
pub const WRONG_TOKEN_FORMAT: BusinessError =
    BusinessError::from_static(1007, "Invalid authorization header format");
pub const GET_USER_ID_FAILED: BusinessError =
    BusinessError::from_static(1008, "Get userID from token failed");
pub const EMPTY_OPEN_ID: BusinessError = BusinessError::from_static(1009, "Empty openID");
pub const NOT_AUTHENTICATED: BusinessError =
    BusinessError::from_static(1010, "User Not Authenticated");
pub const USER_NOT_ADMIN: BusinessError = BusinessError::from_static(1011, "User Not Admin");
pub const INVALID_CREDENTIALS: BusinessError =
    BusinessError::from_static(1012, "username or password incorrect");

// Persistence (2000s)
pub const USER_NOT_FOUND: BusinessError = BusinessError::from_static(2001, "User Not Found");
pub const INSERT_FAILED: BusinessError = BusinessError::from_static(2003, "Insert Failed");
pub const FIND_FAILED: BusinessError =
    BusinessError::from_static(2004, "FindManyByKeywords Operation Failed");
pub const UPDATE_FAILED: BusinessError = BusinessError::from_static(2005, "Update Failed");
pub const INVALID_OBJECT_ID: BusinessError = BusinessError::from_static(2006, "Invalid Object ID");
pub const COUNT_FAILED: BusinessError = BusinessError::from_static(2007, "Count Operation Failed");

// Email (3000s)
pub const EMAIL_ALREADY_EXISTS: BusinessError =
    BusinessError::from_static(3006, "email already exists");

// Request parameters (5000s)
pub const INVALID_PARAMS: BusinessError = BusinessError::from_static(5001, "Invalid Params");
pub const INVALID_BIRTHDAY: BusinessError =
    BusinessError::from_static(5005, "invalid birthday format, use yyyy-MM-dd");

// Account maintenance (10000s)
pub const WRONG_PASSWORD: BusinessError = BusinessError::from_static(10001, "wrong password");
pub const PASSWORD_UNCHANGED: BusinessError =
    BusinessError::from_static(10002, "new password cannot be the same as the old password");
pub const PASSWORD_CONFIRM_MISMATCH: BusinessError =
    BusinessError::from_static(10003, "confirm password does not match the new password");
pub const CONFIRMATION_MISMATCH: BusinessError =
    BusinessError::from_static(10004, "confirmation text does not match");

/// Every registered error, in code order.
pub const ALL: &[BusinessError] = &[
    TOKEN_CREATION_FAILED,
    REQ_NO_TOKEN,
    TOKEN_UNINITIALIZED,
    AUTH_TOKEN_CREATION_FAILED,
    TOKEN_INVALID,
    TOKEN_EXPIRED,
    WRONG_TOKEN_FORMAT,
    GET_USER_ID_FAILED,
    EMPTY_OPEN_ID,
    NOT_AUTHENTICATED,
    USER_NOT_ADMIN,
    INVALID_CREDENTIALS,
    USER_NOT_FOUND,
    INSERT_FAILED,
    FIND_FAILED,
    UPDATE_FAILED,
    INVALID_OBJECT_ID,
    COUNT_FAILED,
    EMAIL_ALREADY_EXISTS,
    INVALID_PARAMS,
    INVALID_BIRTHDAY,
    WRONG_PASSWORD,
    PASSWORD_UNCHANGED,
    PASSWORD_CONFIRM_MISMATCH,
    CONFIRMATION_MISMATCH,
];
