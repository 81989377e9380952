//! Book service - catalog reads and admin mutations

use crate::error::ApiError;
use crate::repositories::BookStore;
use keep_reading_shared::types::{CreateBookInput, UpdateBookInput};
use keep_reading_shared::validation::{validate_create_book, validate_update_book};
use keep_reading_shared::Book;
use tracing::info;
use uuid::Uuid;

pub struct BookService;

/// ISBNs are stored and looked up without surrounding whitespace
fn normalize_isbn(isbn: &str) -> String {
    isbn.trim().to_string()
}

impl BookService {
    pub async fn list(books: &dyn BookStore) -> Result<Vec<Book>, ApiError> {
        Ok(books.list().await?)
    }

    pub async fn get(books: &dyn BookStore, id: Uuid) -> Result<Option<Book>, ApiError> {
        Ok(books.find_by_id(id).await?)
    }

    pub async fn get_by_isbn(books: &dyn BookStore, isbn: &str) -> Result<Option<Book>, ApiError> {
        Ok(books.find_by_isbn(&normalize_isbn(isbn)).await?)
    }

    pub async fn create(books: &dyn BookStore, mut input: CreateBookInput) -> Result<Book, ApiError> {
        input.isbn = normalize_isbn(&input.isbn);
        validate_create_book(&input)?;
        let book = books.create(input).await?;
        info!(book_id = %book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    /// Apply a partial update; at least one field must be present
    pub async fn update(
        books: &dyn BookStore,
        id: Uuid,
        mut input: UpdateBookInput,
    ) -> Result<Book, ApiError> {
        if input.is_empty() {
            return Err(ApiError::BadRequest("No fields to update".to_string()));
        }
        input.isbn = input.isbn.as_deref().map(normalize_isbn);
        validate_update_book(&input)?;
        let book = books.update(id, input).await?;
        info!(book_id = %book.id, "Book updated");
        Ok(book)
    }

    pub async fn delete(books: &dyn BookStore, id: Uuid) -> Result<Book, ApiError> {
        let book = books.delete(id).await?;
        info!(book_id = %book.id, "Book deleted");
        Ok(book)
    }
}
