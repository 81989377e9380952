//! Category repository for database operations

use super::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keep_reading_shared::{Category, CreateCategoryInput};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Category {
            id: r.id,
            name: r.name,
            slug: r.slug,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Category storage; slugs are unique
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories ordered by name
    async fn list(&self) -> Result<Vec<Category>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError>;

    async fn create(&self, input: CreateCategoryInput) -> Result<Category, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<Category, StoreError>;
}

/// PostgreSQL-backed category store
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let categories = sqlx::query_as::<_, CategoryRecord>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM categories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, CategoryRecord>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category.map(Category::from))
    }

    async fn create(&self, input: CreateCategoryInput) -> Result<Category, StoreError> {
        let category = sqlx::query_as::<_, CategoryRecord>(
            r#"
            INSERT INTO categories (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(input.name)
        .bind(input.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "A category with this slug already exists"))?;

        Ok(category.into())
    }

    async fn delete(&self, id: Uuid) -> Result<Category, StoreError> {
        let category = sqlx::query_as::<_, CategoryRecord>(
            r#"
            DELETE FROM categories
            WHERE id = $1
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Category".to_string()))?;

        Ok(category.into())
    }
}
