//! User Service - Business logic layer

use axum_helpers::{JwtAuth, codes, end_with_code};
use chrono::{NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;

use crate::dto::{
    ChangePasswordRequest, ChangePasswordResp, DeleteAccountRequest, DeleteAccountResp,
    LoginRequest, LoginResp, LogoutResp, ProfileResp, RegisterRequest, RegisterResp,
    UpdateProfileRequest, UpdateProfileResp, UpdateRoleRequest, UpdateRoleResp, UserView,
};
use crate::error::{UserError, UserResult};
use crate::models::{Gender, RequestContext, Role, UpdateSet, User};
use crate::password::{hash_password, verify_password};
use crate::repository::UserRepository;

/// Prefix of the text a user types to confirm account deletion.
pub const DELETE_CONFIRMATION_PREFIX: &str = "I confirm deleting account";

const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

/// The confirmation text expected from `username`.
pub fn delete_confirmation(username: &str) -> String {
    format!("{DELETE_CONFIRMATION_PREFIX} {username}")
}

/// Account operations on top of a [`UserRepository`].
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            jwt: self.jwt.clone(),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self::with_shared(Arc::new(repository), jwt)
    }

    /// Build on a repository the caller keeps a handle to.
    pub fn with_shared(repository: Arc<R>, jwt: JwtAuth) -> Self {
        Self { repository, jwt }
    }

    /// Create an account.
    ///
    /// The email check and the insert are separate calls, so two concurrent
    /// registrations of one address can both succeed.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: &RegisterRequest) -> UserResult<RegisterResp> {
        if self.repository.count_by_email(&req.email).await? > 0 {
            return Err(UserError::EmailExists(req.email.clone()));
        }

        let user = User::new(&req.username, &req.email, hash_password(&req.password)?);
        self.repository.insert(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(RegisterResp::default())
    }

    /// Check credentials, record the login and issue an access token.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: &LoginRequest) -> UserResult<LoginResp> {
        let user = self
            .repository
            .find_by_email(&req.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&req.password, &user.password)? {
            return Err(UserError::InvalidCredentials);
        }

        self.repository
            .update_last_login_at(user.id, Utc::now())
            .await?;

        let user_id = user.id.to_hex();
        let access_token = self.jwt.issue(&user_id).map_err(|e| {
            end_with_code(
                e,
                codes::AUTH_TOKEN_CREATION_FAILED.code,
                codes::AUTH_TOKEN_CREATION_FAILED.msg,
            )
        })?;

        Ok(LoginResp {
            user_id,
            access_token,
            ..Default::default()
        })
    }

    #[instrument(skip(self))]
    pub async fn get_my_profile(&self, ctx: &RequestContext) -> UserResult<ProfileResp> {
        let user = self.load(ctx.actor()?).await?;

        Ok(ProfileResp {
            user: Some(UserView::from(&user)),
            ..Default::default()
        })
    }

    /// Patch the caller's profile with the non-empty request fields.
    ///
    /// Answers how many fields were supplied; `updatedAt` is always written
    /// and never counted.
    #[instrument(skip(self, req))]
    pub async fn update_my_profile(
        &self,
        ctx: &RequestContext,
        req: &UpdateProfileRequest,
    ) -> UserResult<UpdateProfileResp> {
        let id = ctx.actor()?;
        let update = profile_update(req)?;
        let count = update.changed();

        if self.repository.update_fields(id, update).await? == 0 {
            return Err(UserError::NotFound(id.to_hex()));
        }

        Ok(UpdateProfileResp {
            count,
            ..Default::default()
        })
    }

    #[instrument(skip(self, req))]
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        req: &ChangePasswordRequest,
    ) -> UserResult<ChangePasswordResp> {
        let user = self.load(ctx.actor()?).await?;

        if !verify_password(&req.old_password, &user.password)? {
            return Err(UserError::WrongPassword);
        }
        if req.new_password == req.old_password {
            return Err(UserError::PasswordUnchanged);
        }
        if req.new_password != req.confirm_password {
            return Err(UserError::PasswordConfirmMismatch);
        }

        let hash = hash_password(&req.new_password)?;
        self.repository.update_password(user.id, &hash).await?;

        Ok(ChangePasswordResp::default())
    }

    /// Delete the caller's account once both the password and the typed
    /// confirmation check out.
    #[instrument(skip(self, req))]
    pub async fn delete_account(
        &self,
        ctx: &RequestContext,
        req: &DeleteAccountRequest,
    ) -> UserResult<DeleteAccountResp> {
        let user = self.load(ctx.actor()?).await?;

        if !verify_password(&req.password, &user.password)? {
            return Err(UserError::WrongPassword);
        }
        if req.confirmation != delete_confirmation(&user.username) {
            return Err(UserError::ConfirmationMismatch);
        }

        if !self.repository.delete(user.id).await? {
            return Err(UserError::NotFound(user.id.to_hex()));
        }

        tracing::info!(user_id = %user.id, "Account deleted");
        Ok(DeleteAccountResp::default())
    }

    /// Tokens are stateless, so there is nothing to revoke.
    #[instrument(skip(self))]
    pub async fn logout(&self, ctx: &RequestContext) -> UserResult<LogoutResp> {
        let id = ctx.actor()?;
        tracing::info!(user_id = %id, "User logged out");
        Ok(LogoutResp::default())
    }

    /// Change the role of the user named by the route, on behalf of an admin.
    #[instrument(skip(self, req), fields(role = %req.role))]
    pub async fn update_user_role(
        &self,
        ctx: &RequestContext,
        req: &UpdateRoleRequest,
    ) -> UserResult<UpdateRoleResp> {
        let actor = self.load(ctx.actor()?).await?;
        if !actor.is_admin() {
            return Err(UserError::NotAdmin(actor.id.to_hex()));
        }

        let target = ctx.target()?;
        let role = Role::from_str(&req.role)
            .map_err(|_| UserError::Validation(format!("unknown role '{}'", req.role)))?;

        let mut update = UpdateSet::new();
        update.set("role", role.to_string());
        update.stamp(Utc::now())?;

        if self.repository.update_fields(target, update).await? == 0 {
            return Err(UserError::NotFound(target.to_hex()));
        }

        tracing::info!(actor_id = %actor.id, target_id = %target, %role, "User role updated");
        Ok(UpdateRoleResp::default())
    }

    async fn load(&self, id: ObjectId) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_hex()))
    }
}

/// Collect the non-empty fields of `req`, in request order, plus `updatedAt`.
fn profile_update(req: &UpdateProfileRequest) -> UserResult<UpdateSet> {
    let mut update = UpdateSet::new();

    let text_fields = [
        ("username", &req.username),
        ("avatar", &req.avatar),
        ("firstName", &req.first_name),
        ("lastName", &req.last_name),
    ];
    for (field, value) in text_fields {
        if !value.is_empty() {
            update.set(field, value.as_str());
        }
    }

    if !req.gender.is_empty() {
        let gender = Gender::from_str(&req.gender)
            .map_err(|_| UserError::Validation(format!("unknown gender '{}'", req.gender)))?;
        update.set("gender", gender.to_string());
    }

    if !req.address.is_empty() {
        update.set("address", req.address.as_str());
    }
    if !req.bio.is_empty() {
        update.set("bio", req.bio.as_str());
    }

    if !req.birthday.is_empty() {
        let birthday = NaiveDate::parse_from_str(&req.birthday, BIRTHDAY_FORMAT).map_err(|e| {
            end_with_code(e, codes::INVALID_BIRTHDAY.code, codes::INVALID_BIRTHDAY.msg)
        })?;
        update.set("birthday", birthday.format(BIRTHDAY_FORMAT).to_string());
    }

    update.stamp(Utc::now())?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UPDATED_AT;
    use crate::repository::MockUserRepository;
    use axum_helpers::JwtConfig;
    use mockall::predicate::*;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-key-for-jwt-signing-32chars").unwrap())
    }

    fn service(repo: MockUserRepository) -> UserService<MockUserRepository> {
        UserService::new(repo, jwt())
    }

    fn stored_user(password: &str) -> User {
        User::new("alice", "a@x.com", hash_password(password).unwrap())
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_sets_defaults() {
        let mut repo = MockUserRepository::new();
        repo.expect_count_by_email()
            .with(eq("a@x.com"))
            .times(1)
            .returning(|_| Ok(0));
        repo.expect_insert()
            .withf(|user| {
                user.username == "alice"
                    && user.password != "pw"
                    && verify_password("pw", &user.password).unwrap()
                    && user.role == Role::User
            })
            .times(1)
            .returning(|_| Ok(()));

        let resp = service(repo).register(&register_request()).await.unwrap();
        assert_eq!(resp.base.code, 0);
    }

    #[tokio::test]
    async fn test_register_rejects_known_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_count_by_email().returning(|_| Ok(1));
        repo.expect_insert().never();

        let result = service(repo).register(&register_request()).await;
        assert!(matches!(result, Err(UserError::EmailExists(email)) if email == "a@x.com"));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_both_pass_the_email_check() {
        let mut repo = MockUserRepository::new();
        repo.expect_count_by_email().times(2).returning(|_| Ok(0));
        repo.expect_insert().times(2).returning(|_| Ok(()));

        let service = service(repo);
        let req = register_request();
        let (first, second) = tokio::join!(service.register(&req), service.register(&req));

        assert!(first.is_ok());
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_login_issues_token_and_records_login() {
        let user = stored_user("pw");
        let id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update_last_login_at()
            .withf(move |user_id, _| *user_id == id)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repo);
        let resp = service
            .login(&LoginRequest {
                email: "a@x.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        assert_eq!(resp.user_id, id.to_hex());
        let claims = jwt().verify(&resp.access_token).unwrap();
        assert_eq!(claims.user_id, id.to_hex());
    }

    #[tokio::test]
    async fn test_login_wrong_password_does_not_touch_last_login() {
        let user = stored_user("pw");

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update_last_login_at().never();

        let result = service(repo)
            .login(&LoginRequest {
                email: "a@x.com".into(),
                password: "nope".into(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let result = service(repo)
            .login(&LoginRequest {
                email: "ghost@x.com".into(),
                password: "pw".into(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_update_profile_with_only_bio() {
        let id = ObjectId::new();

        let mut repo = MockUserRepository::new();
        repo.expect_update_fields()
            .withf(move |user_id, update| {
                *user_id == id && update.fields().collect::<Vec<_>>() == vec!["bio", UPDATED_AT]
            })
            .times(1)
            .returning(|_, _| Ok(1));

        let req = UpdateProfileRequest {
            bio: "hello".into(),
            ..Default::default()
        };
        let resp = service(repo)
            .update_my_profile(&RequestContext::new(id.to_hex()), &req)
            .await
            .unwrap();

        assert_eq!(resp.count, 1);
    }

    #[tokio::test]
    async fn test_update_profile_maps_gender_and_birthday() {
        let id = ObjectId::new();

        let mut repo = MockUserRepository::new();
        repo.expect_update_fields()
            .withf(|_, update| {
                update.get("gender").and_then(|v| v.as_str()) == Some("female")
                    && update.get("birthday").and_then(|v| v.as_str()) == Some("1990-05-17")
                    && update.changed() == 3
            })
            .returning(|_, _| Ok(1));

        let req = UpdateProfileRequest {
            username: "alice2".into(),
            gender: "female".into(),
            birthday: "1990-05-17".into(),
            ..Default::default()
        };
        let resp = service(repo)
            .update_my_profile(&RequestContext::new(id.to_hex()), &req)
            .await
            .unwrap();

        assert_eq!(resp.count, 3);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_bad_birthday() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_fields().never();

        let req = UpdateProfileRequest {
            birthday: "17/05/1990".into(),
            ..Default::default()
        };
        let result = service(repo)
            .update_my_profile(&RequestContext::new(ObjectId::new().to_hex()), &req)
            .await;

        assert!(
            matches!(result, Err(UserError::Business(err)) if err == codes::INVALID_BIRTHDAY)
        );
    }

    #[tokio::test]
    async fn test_update_profile_rejects_unknown_gender() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_fields().never();

        let req = UpdateProfileRequest {
            gender: "robot".into(),
            ..Default::default()
        };
        let result = service(repo)
            .update_my_profile(&RequestContext::new(ObjectId::new().to_hex()), &req)
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_update_still_stamps() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_fields()
            .withf(|_, update| update.changed() == 0 && update.contains(UPDATED_AT))
            .returning(|_, _| Ok(1));

        let resp = service(repo)
            .update_my_profile(
                &RequestContext::new(ObjectId::new().to_hex()),
                &UpdateProfileRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(resp.count, 0);
    }

    fn password_change(old: &str, new: &str, confirm: &str) -> ChangePasswordRequest {
        ChangePasswordRequest {
            old_password: old.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        }
    }

    async fn change_password_with(req: ChangePasswordRequest) -> UserResult<ChangePasswordResp> {
        let user = stored_user("old-pw");
        let ctx = RequestContext::new(user.id.to_hex());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update_password().returning(|_, _| Ok(()));

        service(repo).change_password(&ctx, &req).await
    }

    #[tokio::test]
    async fn test_change_password_checks_in_order() {
        let wrong_old = change_password_with(password_change("bad", "old-pw", "x")).await;
        assert!(matches!(wrong_old, Err(UserError::WrongPassword)));

        let unchanged = change_password_with(password_change("old-pw", "old-pw", "x")).await;
        assert!(matches!(unchanged, Err(UserError::PasswordUnchanged)));

        let mismatch = change_password_with(password_change("old-pw", "new-pw", "x")).await;
        assert!(matches!(mismatch, Err(UserError::PasswordConfirmMismatch)));

        let ok = change_password_with(password_change("old-pw", "new-pw", "new-pw")).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_change_password_persists_new_hash() {
        let user = stored_user("old-pw");
        let ctx = RequestContext::new(user.id.to_hex());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update_password()
            .withf(|_, hash| verify_password("new-pw", hash).unwrap())
            .times(1)
            .returning(|_, _| Ok(()));

        service(repo)
            .change_password(&ctx, &password_change("old-pw", "new-pw", "new-pw"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_account_requires_exact_confirmation() {
        let user = stored_user("pw");
        let ctx = RequestContext::new(user.id.to_hex());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_delete().never();

        let result = service(repo)
            .delete_account(
                &ctx,
                &DeleteAccountRequest {
                    password: "pw".into(),
                    confirmation: "I confirm deleting account bob".into(),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::ConfirmationMismatch)));
    }

    #[tokio::test]
    async fn test_delete_account_wrong_password() {
        let user = stored_user("pw");
        let ctx = RequestContext::new(user.id.to_hex());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_delete().never();

        let result = service(repo)
            .delete_account(
                &ctx,
                &DeleteAccountRequest {
                    password: "nope".into(),
                    confirmation: delete_confirmation("alice"),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::WrongPassword)));
    }

    #[tokio::test]
    async fn test_delete_account() {
        let user = stored_user("pw");
        let id = user.id;
        let ctx = RequestContext::new(id.to_hex());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(true));

        service(repo)
            .delete_account(
                &ctx,
                &DeleteAccountRequest {
                    password: "pw".into(),
                    confirmation: "I confirm deleting account alice".into(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_profile_of_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo)
            .get_my_profile(&RequestContext::new(ObjectId::new().to_hex()))
            .await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_token_with_bad_user_id() {
        let repo = MockUserRepository::new();

        let result = service(repo)
            .get_my_profile(&RequestContext::new("not-an-object-id"))
            .await;

        assert!(matches!(result, Err(UserError::InvalidActor(_))));
    }

    #[tokio::test]
    async fn test_role_update_requires_admin() {
        let actor = stored_user("pw");
        let ctx = RequestContext::new(actor.id.to_hex()).with_target(ObjectId::new().to_hex());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(actor.clone())));
        repo.expect_update_fields().never();

        let result = service(repo)
            .update_user_role(&ctx, &UpdateRoleRequest { role: "admin".into() })
            .await;

        assert!(matches!(result, Err(UserError::NotAdmin(_))));
    }

    #[tokio::test]
    async fn test_role_update_targets_route_user() {
        let mut actor = stored_user("pw");
        actor.role = Role::Admin;
        let actor_id = actor.id;
        let target = ObjectId::new();
        let ctx = RequestContext::new(actor_id.to_hex()).with_target(target.to_hex());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(actor_id))
            .returning(move |_| Ok(Some(actor.clone())));
        repo.expect_update_fields()
            .withf(move |id, update| {
                *id == target && update.get("role").and_then(|v| v.as_str()) == Some("admin")
            })
            .times(1)
            .returning(|_, _| Ok(1));

        service(repo)
            .update_user_role(&ctx, &UpdateRoleRequest { role: "admin".into() })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_role_update_unknown_role_or_target() {
        let mut actor = stored_user("pw");
        actor.role = Role::Admin;
        let ctx = RequestContext::new(actor.id.to_hex()).with_target(ObjectId::new().to_hex());

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(actor.clone())));
        repo.expect_update_fields().returning(|_, _| Ok(0));

        let service = service(repo);
        let unknown_role = service
            .update_user_role(&ctx, &UpdateRoleRequest { role: "root".into() })
            .await;
        assert!(matches!(unknown_role, Err(UserError::Validation(_))));

        let missing_target = service
            .update_user_role(&ctx, &UpdateRoleRequest { role: "user".into() })
            .await;
        assert!(matches!(missing_target, Err(UserError::NotFound(_))));
    }
}
