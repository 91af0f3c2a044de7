use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, ProfileResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".into()));
    }

    let user = state.users.authenticate(email, &payload.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.issue(&user.id.to_string(), &user.name, &user.email)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse { token, user }))
}

#[instrument(skip_all)]
pub async fn profile(AuthUser(claims): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: format!("Hello, {} ({})", claims.name, claims.email),
        user_id: claims.sub,
        name: claims.name,
        email: claims.email,
    })
}
