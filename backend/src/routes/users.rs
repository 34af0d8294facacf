//! User and session routes
//!
//! Registration, login, logout, token refresh, profile reads/updates,
//! password change and verified self-deletion. The refresh token rides
//! in an HTTP-only `jwt` cookie; the access token is returned in the
//! body and presented as a bearer token.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::repositories::UserPatch;
use crate::services::SessionService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use blackboard_shared::types::{
    AccessTokenResponse, AuthResponse, ChangePasswordRequest, DeleteAccountRequest, LoginRequest,
    LogoutRequest, MessageResponse, RegisterRequest, UpdateProfileRequest, UserResponse,
    UsersResponse,
};
use uuid::Uuid;

/// Name of the refresh-token cookie
const REFRESH_COOKIE: &str = "jwt";

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .route("/all", get(list_users))
        .route("/profile/:id", get(profile))
        .route("/update/:id", put(update_profile))
        .route("/change-password/:id", post(change_password))
        .route("/delete", delete(delete_account))
}

/// Build the HTTP-only refresh cookie
///
/// The cookie max-age (24h) is shorter than the refresh token's signed
/// expiry (7d); both values are carried in the configuration.
fn refresh_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, value))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(
            state.config().jwt.refresh_cookie_max_age_secs,
        ))
        .build()
}

fn clear_refresh_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(REFRESH_COOKIE).path("/").build())
}

fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation("Valid user ID is required".to_string()))
}

/// Register a new user
///
/// POST /api/user/create
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let session = SessionService::register(state.users(), state.jwt(), req).await?;

    let jar = jar.add(refresh_cookie(&state, session.refresh_token));
    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            access_token: session.access_token,
            user: session.user,
        }),
    ))
}

/// Login with email and password
///
/// POST /api/user/login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let session = SessionService::login(state.users(), state.jwt(), &req.email, &req.password).await?;

    let jar = jar.add(refresh_cookie(&state, session.refresh_token));
    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            access_token: session.access_token,
            user: session.user,
        }),
    ))
}

/// Clear the stored refresh token and the refresh cookie
///
/// POST /api/user/logout
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LogoutRequest>,
) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    SessionService::logout(state.users(), &req.email).await?;

    Ok((
        clear_refresh_cookie(jar),
        Json(MessageResponse {
            success: true,
            message: "Logout successful".to_string(),
        }),
    ))
}

/// Mint a new access token from the refresh cookie
///
/// POST /api/user/refresh-token
async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<Json<AccessTokenResponse>> {
    let cookie = jar.get(REFRESH_COOKIE).ok_or_else(|| {
        ApiError::Unauthorized("Unauthorized: Missing refresh token".to_string())
    })?;

    let access_token =
        SessionService::refresh_access_token(state.users(), state.jwt(), cookie.value()).await?;

    Ok(Json(AccessTokenResponse {
        success: true,
        access_token,
    }))
}

/// List all users as public summaries
///
/// GET /api/user/all
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = SessionService::list_users(state.users()).await?;
    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}

/// Fetch one user's public profile (requires authentication)
///
/// GET /api/user/profile/:id
async fn profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let id = parse_user_id(&id)?;
    let user = SessionService::profile(state.users(), id).await?;

    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

/// Patch profile fields (requires authentication)
///
/// PUT /api/user/update/:id
async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let id = parse_user_id(&id)?;

    let user = SessionService::update_profile(
        state.users(),
        id,
        UserPatch {
            name: req.name,
            image: req.image,
            designation: req.designation,
        },
    )
    .await?;

    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

/// Replace the password after verifying the old one (requires authentication)
///
/// POST /api/user/change-password/:id
async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let id = parse_user_id(&id)?;

    let (access_token, user) = SessionService::change_password(
        state.users(),
        state.jwt(),
        id,
        &req.old_password,
        &req.new_password,
    )
    .await?;

    Ok(Json(AuthResponse {
        success: true,
        access_token,
        user,
    }))
}

/// Delete the account matching email and password
///
/// DELETE /api/user/delete
async fn delete_account(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DeleteAccountRequest>,
) -> ApiResult<Json<MessageResponse>> {
    SessionService::delete_account(state.users(), &req.email, &req.password).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "User deleted successfully".to_string(),
    }))
}
