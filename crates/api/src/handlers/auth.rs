//! Handlers for the `/auth` resource (register, signin, signout, me).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rewear_core::error::CoreError;
use rewear_core::naming::generate_avatar_seed;
use rewear_core::validation::{normalize_email, require_fields, validate_request};
use rewear_db::models::user::{CreateUser, User, UserProfile};
use rewear_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookie::{clear_cookie, session_cookie};
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
///
/// Fields default to empty so a missing field reports as "required" rather
/// than as a JSON shape error.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(max = 100, message = "Name must be less than 100 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Location must be less than 100 characters"))]
    pub location: String,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Payload of a successful register or signin.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an account. Every account starts with the default points balance;
/// the request cannot set it.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    require_fields(&[
        ("email", Some(input.email.as_str())),
        ("password", Some(input.password.as_str())),
        ("name", Some(input.name.as_str())),
        ("location", Some(input.location.as_str())),
    ])?;
    validate_request(&input)?;

    let email = normalize_email(&input.email);
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let name = input.name.trim().to_string();
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            avatar_seed: Some(generate_avatar_seed(&name)),
            name,
            location: Some(input.location.trim().to_string()),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    let (cookie, body) = issue_session(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::with_message("User registered successfully", body)),
    ))
}

/// POST /api/auth/signin
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SigninRequest>,
) -> AppResult<impl IntoResponse> {
    require_fields(&[
        ("email", Some(input.email.as_str())),
        ("password", Some(input.password.as_str())),
    ])?;

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User signed in");

    let (cookie, body) = issue_session(&state, &user)?;
    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::with_message("Sign-in successful", body)),
    ))
}

/// POST /api/auth/signout
pub async fn signout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    tracing::info!(user_id = auth.user.id, "User signed out");
    let cookie = clear_cookie(state.config.environment.is_production());
    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::with_message("Signed out", ())),
    ))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> AppResult<Json<ApiResponse<MeResponse>>> {
    Ok(Json(ApiResponse::with_message(
        "User authenticated",
        MeResponse {
            user: UserProfile::from(&auth.user),
        },
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign a token for `user` and build the matching `Set-Cookie` value.
fn issue_session(state: &AppState, user: &User) -> AppResult<(String, SessionResponse)> {
    let jwt = &state.config.jwt;
    let token = generate_token(user.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;
    let cookie = session_cookie(
        &token,
        jwt.expiry_secs(),
        state.config.environment.is_production(),
    );
    Ok((
        cookie,
        SessionResponse {
            user: UserProfile::from(user),
            token,
        },
    ))
}
