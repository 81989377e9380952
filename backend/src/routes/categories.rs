//! Category routes

use crate::auth::{require_admin, RequestContext};
use crate::error::ApiResult;
use crate::services::CategoryService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use keep_reading_shared::types::CreateCategoryInput;
use keep_reading_shared::Category;
use uuid::Uuid;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", get(get_category).delete(delete_category))
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(CategoryService::list(state.categories()).await?))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Option<Category>>> {
    Ok(Json(CategoryService::get(state.categories(), id).await?))
}

async fn create_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<CreateCategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    require_admin(&ctx)?;
    let category = CategoryService::create(state.categories(), input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn delete_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Category>> {
    require_admin(&ctx)?;
    Ok(Json(CategoryService::delete(state.categories(), id).await?))
}
