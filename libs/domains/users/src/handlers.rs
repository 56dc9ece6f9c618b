use axum::{
    Router,
    extract::{MatchedPath, Path, State},
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, patch, post},
};
use axum_helpers::{
    AppError, AuthClaims, JwtAuth, ValidatedJson, jwt_auth_middleware, post_process,
    errors::responses::{AuthErrorResponse, BusinessErrorResponse, EnvelopeBody},
};
use envelope::Flatten;
use serde::Serialize;
use std::sync::Arc;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::dto::{
    ChangePasswordRequest, DeleteAccountRequest, LoginRequest, RegisterRequest,
    UpdateProfileRequest, UpdateRoleRequest, UserView,
};
use crate::error::UserResult;
use crate::models::RequestContext;
use crate::repository::UserRepository;
use crate::service::UserService;

const BEARER: &str = "bearer_auth";

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        register,
        login,
        get_my_profile,
        update_my_profile,
        change_password,
        delete_account,
        logout,
        update_user_role,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            DeleteAccountRequest,
            UpdateRoleRequest,
            UserView,
            EnvelopeBody
        ),
        responses(BusinessErrorResponse, AuthErrorResponse)
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Users", description = "Account registration, login and profile management")
    )
)]
pub struct ApiDoc;

/// Create the users router.
///
/// `register` and `login` are public; every other route sits behind
/// [`jwt_auth_middleware`].
pub fn router<R: UserRepository + 'static>(service: UserService<R>, jwt_auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route(
            "/me",
            get(get_my_profile::<R>)
                .patch(update_my_profile::<R>)
                .delete(delete_account::<R>),
        )
        .route("/me/password", patch(change_password::<R>))
        .route("/logout", post(logout::<R>))
        .route("/{user_id}/role", patch(update_user_role::<R>))
        .route_layer(from_fn_with_state(jwt_auth, jwt_auth_middleware));

    Router::new()
        .route("/register", post(register::<R>))
        .route("/login", post(login::<R>))
        .merge(protected)
        .with_state(shared_service)
}

/// Every handler ends here.
fn finish<Req, T>(matched: &MatchedPath, req: Option<&Req>, result: UserResult<T>) -> Response
where
    Req: Serialize + ?Sized,
    T: Flatten + Serialize,
{
    post_process(matched.as_str(), req, result.map_err(AppError::from))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, or a business error", body = EnvelopeBody),
        (status = 500, description = "Internal error", content_type = "text/plain", body = String)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    matched: MatchedPath,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Response {
    let result = service.register(&req).await;
    finish(&matched, Some(&req), result)
}

/// Log in and receive an access token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "`{userId, accessToken}`, or a business error", body = EnvelopeBody),
        (status = 500, description = "Internal error", content_type = "text/plain", body = String)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    matched: MatchedPath,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Response {
    let result = service.login(&req).await;
    finish(&matched, Some(&req), result)
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User view, or a business error", body = EnvelopeBody),
        (status = 500, description = "Internal error", content_type = "text/plain", body = String)
    )
)]
async fn get_my_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    matched: MatchedPath,
    AuthClaims(claims): AuthClaims,
) -> Response {
    let ctx = RequestContext::from_claims(&claims);
    let result = service.get_my_profile(&ctx).await;
    finish::<(), _>(&matched, None, result)
}

/// Update profile fields; empty fields are left untouched
#[utoipa::path(
    patch,
    path = "/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "`{count}` of changed fields, or a business error", body = EnvelopeBody),
        (status = 500, description = "Internal error", content_type = "text/plain", body = String)
    )
)]
async fn update_my_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    matched: MatchedPath,
    AuthClaims(claims): AuthClaims,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Response {
    let ctx = RequestContext::from_claims(&claims);
    let result = service.update_my_profile(&ctx, &req).await;
    finish(&matched, Some(&req), result)
}

/// Change the password of the authenticated user
#[utoipa::path(
    patch,
    path = "/me/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed, or a business error", body = EnvelopeBody),
        (status = 500, description = "Internal error", content_type = "text/plain", body = String)
    )
)]
async fn change_password<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    matched: MatchedPath,
    AuthClaims(claims): AuthClaims,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Response {
    let ctx = RequestContext::from_claims(&claims);
    let result = service.change_password(&ctx, &req).await;
    finish(&matched, Some(&req), result)
}

/// Delete the authenticated user's account
#[utoipa::path(
    delete,
    path = "/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = DeleteAccountRequest,
    responses(
        (status = 200, description = "Account deleted, or a business error", body = EnvelopeBody),
        (status = 500, description = "Internal error", content_type = "text/plain", body = String)
    )
)]
async fn delete_account<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    matched: MatchedPath,
    AuthClaims(claims): AuthClaims,
    ValidatedJson(req): ValidatedJson<DeleteAccountRequest>,
) -> Response {
    let ctx = RequestContext::from_claims(&claims);
    let result = service.delete_account(&ctx, &req).await;
    finish(&matched, Some(&req), result)
}

/// Log out. Tokens are stateless and stay valid until they expire.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out, or a business error", body = EnvelopeBody)
    )
)]
async fn logout<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    matched: MatchedPath,
    AuthClaims(claims): AuthClaims,
) -> Response {
    let ctx = RequestContext::from_claims(&claims);
    let result = service.logout(&ctx).await;
    finish::<(), _>(&matched, None, result)
}

/// Change another user's role (admin only)
#[utoipa::path(
    patch,
    path = "/{user_id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "Hex ObjectId of the target user")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated, or a business error", body = EnvelopeBody),
        (status = 500, description = "Internal error", content_type = "text/plain", body = String)
    )
)]
async fn update_user_role<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    matched: MatchedPath,
    AuthClaims(claims): AuthClaims,
    Path(user_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> Response {
    let ctx = RequestContext::from_claims(&claims).with_target(user_id);
    let result = service.update_user_role(&ctx, &req).await;
    finish(&matched, Some(&req), result)
}
