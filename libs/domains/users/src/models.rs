use axum_helpers::JwtClaims;
use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::{Bson, Document, from_document, oid::ObjectId, to_bson, to_document};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use crate::error::{UserError, UserResult};

/// Field that every update stamps and `changed()` ignores.
pub const UPDATED_AT: &str = "updatedAt";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn description(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

/// Account status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Banned,
}

impl UserStatus {
    pub fn description(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Suspended => "Suspended",
            UserStatus::Banned => "Banned",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn description(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// User record as stored in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC string, never the plain password
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A freshly registered account: role `user`, status `active`.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: email.into(),
            password: password_hash.into(),
            phone: String::new(),
            avatar: String::new(),
            address: String::new(),
            role: Role::User,
            status: UserStatus::Active,
            gender: None,
            birthday: None,
            bio: String::new(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Partial update of a user record.
///
/// Holds only the fields a request actually supplied, in insertion order,
/// keyed by their stored names. Applied as a `$set` patch, so anything not
/// listed is left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    fields: Document,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, value: impl Into<Bson>) -> &mut Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Always sets `updatedAt`.
    pub fn stamp(&mut self, now: DateTime<Utc>) -> UserResult<&mut Self> {
        self.fields.insert(UPDATED_AT, to_bson(&now)?);
        Ok(self)
    }

    /// Number of requested changes, not counting the timestamp.
    pub fn changed(&self) -> u64 {
        self.fields.keys().filter(|key| *key != UPDATED_AT).count() as u64
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Bson> {
        self.fields.get(field)
    }

    pub fn into_document(self) -> Document {
        self.fields
    }

    /// Apply the patch to an in-memory record.
    pub fn apply_to(&self, user: &User) -> UserResult<User> {
        let mut document = to_document(user)?;
        for (field, value) in &self.fields {
            document.insert(field.clone(), value.clone());
        }
        Ok(from_document(document)?)
    }
}

/// Who is acting, and on whom.
///
/// The actor always comes from the verified token. The target, when an
/// endpoint has one, comes from the route and is never taken from the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub actor_id: String,
    pub target_id: Option<String>,
}

impl RequestContext {
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            target_id: None,
        }
    }

    pub fn from_claims(claims: &JwtClaims) -> Self {
        Self::new(claims.user_id.clone())
    }

    pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    pub fn actor(&self) -> UserResult<ObjectId> {
        ObjectId::parse_str(&self.actor_id).map_err(|_| UserError::InvalidActor(self.actor_id.clone()))
    }

    pub fn target(&self) -> UserResult<ObjectId> {
        let target = self
            .target_id
            .as_deref()
            .ok_or_else(|| UserError::Validation("missing target user id".to_string()))?;
        ObjectId::parse_str(target).map_err(|_| UserError::InvalidId(target.to_string()))
    }
}
