use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rand::{distributions::Alphanumeric, Rng};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        cookie::{expired_cookie, extract_session_token, session_cookie},
        dto::{
            LoginRequest, MessageResponse, ProviderLoginRequest, RegisterRequest, SafeUser,
            UpdateProfileRequest,
        },
        extractors::SessionUser,
        jwt::JwtKeys,
        password::verify_password,
        repo_types::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/login/provider", post(login_with_provider))
        .route("/logout", get(logout))
        .route("/me", get(get_me).patch(update_me))
        .route("/loggedin", get(login_status))
}

/// Sign a session token for the user and wrap it in a `Set-Cookie` header.
fn issue_session(state: &AppState, user_id: Uuid) -> Result<HeaderMap, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user_id)?;
    let cookie = session_cookie(&token, keys.ttl.as_secs(), state.config.cookie_secure)
        .map_err(|e| ApiError::Internal(e.into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok(headers)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<SafeUser>), ApiError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        warn!("registration with missing fields");
        return Err(ApiError::Validation(
            "Please fill in all required fields".to_string(),
        ));
    }

    if payload.password.len() < 6 {
        warn!("registration password too short");
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    // Lookup-then-insert is not atomic: two concurrent registrations can both
    // pass this check. The unique index on users.email is the backstop.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let user = User::create(
        &state.db,
        &payload.name,
        &payload.email,
        &payload.password,
        None,
    )
    .await?
    .ok_or(ApiError::CreationFailed)?;

    let headers = issue_session(&state, user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, headers, Json(SafeUser::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<SafeUser>), ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        warn!("login with missing fields");
        return Err(ApiError::Validation(
            "Please add email and password".to_string(),
        ));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::NotFound("User not found, please signup".to_string())
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Authentication("Invalid user data".to_string()));
    }

    let headers = issue_session(&state, user.id)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((headers, Json(SafeUser::from(user))))
}

/// Login with a profile obtained from an identity provider. First sign-in
/// creates the account with a random password it can never use directly.
#[instrument(skip(state, payload))]
pub async fn login_with_provider(
    State(state): State<AppState>,
    Json(payload): Json<ProviderLoginRequest>,
) -> Result<(HeaderMap, Json<SafeUser>), ApiError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        warn!("provider login with missing profile fields");
        return Err(ApiError::Validation(
            "Please fill in all required fields".to_string(),
        ));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => User::create(
            &state.db,
            &payload.name,
            &payload.email,
            &generate_password(),
            payload.photo.as_deref(),
        )
        .await?
        .ok_or(ApiError::CreationFailed)?,
    };

    let headers = issue_session(&state, user.id)?;
    info!(user_id = %user.id, method = ?payload.auth_method, "user logged in via provider");
    Ok((headers, Json(SafeUser::from(user))))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let cookie =
        expired_cookie(state.config.cookie_secure).map_err(|e| ApiError::Internal(e.into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    info!("user logged out");
    Ok((
        headers,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<SafeUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found, please signup".to_string()))?;
    Ok(Json(SafeUser::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<SafeUser>, ApiError> {
    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Name cannot be empty".to_string()));
        }
    }

    let user = User::update_profile(
        &state.db,
        user_id,
        payload.name.as_deref(),
        payload.photo.as_deref(),
        payload.phone.as_deref(),
        payload.bio.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found, please signup".to_string()))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(SafeUser::from(user)))
}

/// Reports whether the request carries a currently valid session cookie.
/// Never fails: a missing or invalid token is simply `false`.
#[instrument(skip(state, headers))]
pub async fn login_status(State(state): State<AppState>, headers: HeaderMap) -> Json<bool> {
    let keys = JwtKeys::from_ref(&state);
    let logged_in = extract_session_token(&headers)
        .map(|token| keys.verify(&token).is_ok())
        .unwrap_or(false);
    Json(logged_in)
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
