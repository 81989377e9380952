//! Book repository for database operations

use super::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use keep_reading_shared::{Book, CreateBookInput, UpdateBookInput};
use sqlx::PgPool;
use uuid::Uuid;

/// Book record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub price: f64,
    pub isbn: String,
    pub cover_image: Option<String>,
    pub category: String,
    pub stock: i32,
    pub published: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Book {
            id: r.id,
            title: r.title,
            author: r.author,
            description: r.description,
            price: r.price,
            isbn: r.isbn,
            cover_image: r.cover_image,
            category: r.category,
            stock: r.stock,
            published: r.published,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Catalog storage; ISBNs are unique
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, newest first
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError>;

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError>;

    async fn create(&self, input: CreateBookInput) -> Result<Book, StoreError>;

    async fn update(&self, id: Uuid, changes: UpdateBookInput) -> Result<Book, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<Book, StoreError>;
}

const BOOK_COLUMNS: &str = "id, title, author, description, price, isbn, cover_image, category, \
                            stock, published, created_at, updated_at";

/// PostgreSQL-backed book store
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookRepository {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, BookRecord>(&format!(
            "SELECT {} FROM books ORDER BY created_at DESC",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, BookRecord>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book.map(Book::from))
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, BookRecord>(&format!(
            "SELECT {} FROM books WHERE isbn = $1",
            BOOK_COLUMNS
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book.map(Book::from))
    }

    async fn create(&self, input: CreateBookInput) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, BookRecord>(&format!(
            r#"
            INSERT INTO books (title, author, description, price, isbn, cover_image, category, stock, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(input.title)
        .bind(input.author)
        .bind(input.description)
        .bind(input.price)
        .bind(input.isbn)
        .bind(input.cover_image)
        .bind(input.category)
        .bind(input.stock)
        .bind(input.published)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "A book with this ISBN already exists"))?;

        Ok(book.into())
    }

    async fn update(&self, id: Uuid, changes: UpdateBookInput) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, BookRecord>(&format!(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                isbn = COALESCE($6, isbn),
                cover_image = COALESCE($7, cover_image),
                category = COALESCE($8, category),
                stock = COALESCE($9, stock),
                published = COALESCE($10, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.author)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.isbn)
        .bind(changes.cover_image)
        .bind(changes.category)
        .bind(changes.stock)
        .bind(changes.published)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "A book with this ISBN already exists"))?
        .ok_or_else(|| StoreError::NotFound("Book".to_string()))?;

        Ok(book.into())
    }

    async fn delete(&self, id: Uuid) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, BookRecord>(&format!(
            "DELETE FROM books WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "Book is referenced by existing orders"))?
        .ok_or_else(|| StoreError::NotFound("Book".to_string()))?;

        Ok(book.into())
    }
}
