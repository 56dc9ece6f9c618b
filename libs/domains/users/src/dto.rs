//! Request bodies and response values of the user endpoints.
//!
//! Requests are logged by the dispatch layer, so every password field is
//! `skip_serializing`. Responses embed a [`BaseResp`] and are flattened into
//! the envelope's `data`.

use chrono::{DateTime, Utc};
use envelope::{BaseResp, Flatten};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::User;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Profile fields to change. Empty fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 64))]
    pub username: String,
    #[validate(length(max = 512))]
    pub avatar: String,
    #[validate(length(max = 64))]
    pub first_name: String,
    #[validate(length(max = 64))]
    pub last_name: String,
    /// `male`, `female` or `other`
    pub gender: String,
    #[validate(length(max = 256))]
    pub address: String,
    #[validate(length(max = 1024))]
    pub bio: String,
    /// `yyyy-MM-dd`
    #[schema(example = "1990-05-17")]
    pub birthday: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(skip_serializing)]
    #[validate(length(min = 1))]
    pub old_password: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
    #[serde(skip_serializing)]
    #[validate(length(min = 1))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeleteAccountRequest {
    #[serde(skip_serializing)]
    #[validate(length(min = 1))]
    pub password: String,
    /// Must read `I confirm deleting account <username>`
    #[validate(length(min = 1))]
    pub confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    /// `admin` or `user`
    #[validate(length(min = 1))]
    pub role: String,
}

/// Public view of a user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Flatten, ToSchema)]
#[serde(rename_all = "camelCase")]
#[envelope(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub username: String,
    pub avatar: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub role: String,
    pub status: String,
    pub phone: String,
    pub address: String,
    pub bio: String,
    pub birthday: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            email: user.email.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            gender: user
                .gender
                .map(|gender| gender.description().to_string())
                .unwrap_or_default(),
            role: user.role.description().to_string(),
            status: user.status.description().to_string(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            bio: user.bio.clone(),
            birthday: user
                .birthday
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            last_login_at: user.last_login_at,
            created_at: Some(user.created_at),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Flatten)]
pub struct RegisterResp {
    #[serde(skip)]
    #[envelope(embed)]
    pub base: BaseResp,
}

#[derive(Debug, Clone, Default, Serialize, Flatten)]
#[serde(rename_all = "camelCase")]
#[envelope(rename_all = "camelCase")]
pub struct LoginResp {
    #[serde(skip)]
    #[envelope(embed)]
    pub base: BaseResp,
    pub user_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Flatten)]
pub struct ProfileResp {
    #[serde(skip)]
    #[envelope(embed)]
    pub base: BaseResp,
    #[serde(flatten)]
    #[envelope(embed)]
    pub user: Option<UserView>,
}

#[derive(Debug, Clone, Default, Serialize, Flatten)]
pub struct UpdateProfileResp {
    #[serde(skip)]
    #[envelope(embed)]
    pub base: BaseResp,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Flatten)]
pub struct ChangePasswordResp {
    #[serde(skip)]
    #[envelope(embed)]
    pub base: BaseResp,
}

#[derive(Debug, Clone, Default, Serialize, Flatten)]
pub struct DeleteAccountResp {
    #[serde(skip)]
    #[envelope(embed)]
    pub base: BaseResp,
}

#[derive(Debug, Clone, Default, Serialize, Flatten)]
pub struct LogoutResp {
    #[serde(skip)]
    #[envelope(embed)]
    pub base: BaseResp,
}

#[derive(Debug, Clone, Default, Serialize, Flatten)]
pub struct UpdateRoleResp {
    #[serde(skip)]
    #[envelope(embed)]
    pub base: BaseResp,
}
