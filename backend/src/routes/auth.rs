//! Authentication routes
//!
//! Signup and login. Both are public; the returned token goes into the
//! `Authorization: Bearer` header of later requests.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use keep_reading_shared::types::{AuthPayload, LoginInput, SignupInput};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// POST /api/v1/auth/signup
async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> ApiResult<(StatusCode, Json<AuthPayload>)> {
    let payload = state.auth().signup(&input).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> ApiResult<Json<AuthPayload>> {
    let payload = state.auth().login(&input).await?;
    Ok(Json(payload))
}
