//! Book catalog routes
//!
//! Reads are public. Mutations require the `ADMIN` role.

use crate::auth::{require_admin, RequestContext};
use crate::error::ApiResult;
use crate::services::BookService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use keep_reading_shared::types::{CreateBookInput, UpdateBookInput};
use keep_reading_shared::Book;
use uuid::Uuid;

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/isbn/:isbn", get(book_by_isbn))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

/// GET /api/v1/books - newest first
async fn list_books(State(state): State<AppState>) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(BookService::list(state.books()).await?))
}

/// GET /api/v1/books/:id
async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Option<Book>>> {
    Ok(Json(BookService::get(state.books(), id).await?))
}

/// GET /api/v1/books/isbn/:isbn
async fn book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> ApiResult<Json<Option<Book>>> {
    Ok(Json(BookService::get_by_isbn(state.books(), &isbn).await?))
}

/// POST /api/v1/books
async fn create_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<CreateBookInput>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    require_admin(&ctx)?;
    let book = BookService::create(state.books(), input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /api/v1/books/:id
async fn update_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateBookInput>,
) -> ApiResult<Json<Book>> {
    require_admin(&ctx)?;
    Ok(Json(BookService::update(state.books(), id, input).await?))
}

/// DELETE /api/v1/books/:id
async fn delete_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Book>> {
    require_admin(&ctx)?;
    Ok(Json(BookService::delete(state.books(), id).await?))
}
