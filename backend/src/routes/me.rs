//! Routes for the signed-in caller

use crate::auth::{require_authenticated, RequestContext};
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use keep_reading_shared::types::UpdateProfileInput;
use keep_reading_shared::{Order, PublicUser};

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(me).put(update_profile))
        .route("/orders", get(my_orders))
}

/// GET /api/v1/me
///
/// `null` when the account was deleted after the token was issued.
async fn me(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Option<PublicUser>>> {
    let identity = require_authenticated(&ctx)?;
    let user = UserService::get_user(state.users(), identity.user_id).await?;
    Ok(Json(user))
}

/// GET /api/v1/me/orders
async fn my_orders(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<Order>>> {
    let identity = require_authenticated(&ctx)?;
    let orders = UserService::orders(state.orders(), identity.user_id).await?;
    Ok(Json(orders))
}

/// PUT /api/v1/me
async fn update_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<UpdateProfileInput>,
) -> ApiResult<Json<PublicUser>> {
    let identity = require_authenticated(&ctx)?;
    let user =
        UserService::update_profile(state.users(), state.books(), identity.user_id, input).await?;
    Ok(Json(user))
}
