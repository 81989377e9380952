//! User administration routes (admin only)

use crate::auth::{require_admin, RequestContext};
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use keep_reading_shared::PublicUser;
use uuid::Uuid;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).delete(delete_user))
}

/// GET /api/v1/users
async fn list_users(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<PublicUser>>> {
    require_admin(&ctx)?;
    Ok(Json(UserService::list_users(state.users()).await?))
}

/// GET /api/v1/users/:id
async fn get_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Option<PublicUser>>> {
    require_admin(&ctx)?;
    Ok(Json(UserService::get_user(state.users(), id).await?))
}

/// DELETE /api/v1/users/:id
async fn delete_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PublicUser>> {
    let admin = require_admin(&ctx)?;
    tracing::info!(admin_id = %admin.user_id, target_id = %id, "Deleting user");
    Ok(Json(UserService::delete_user(state.users(), id).await?))
}
