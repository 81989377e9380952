//! User repository for database operations

use super::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keep_reading_shared::{PublicUser, Role};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub favorite_book_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Parsed role; an unrecognised value grants the least privilege
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_else(|e| {
            warn!(user_id = %self.id, error = %e, "Unknown role in user record");
            Role::User
        })
    }

    /// Projection safe to return to callers
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role(),
            address1: self.address1.clone(),
            address2: self.address2.clone(),
            favorite_book_id: self.favorite_book_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
}

/// Input for updating a profile
///
/// `None` leaves the column unchanged; `Some(None)` sets a nullable column
/// to NULL.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub address1: Option<Option<String>>,
    pub address2: Option<Option<String>>,
    pub favorite_book_id: Option<Option<Uuid>>,
}

/// Credential and profile storage
///
/// `create` must report a duplicate email as [`StoreError::Conflict`],
/// including when two inserts race.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// All users, newest first
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<UserRecord, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<UserRecord, StoreError>;
}

const USER_COLUMNS: &str = "id, email, password_hash, full_name, role, address1, address2, \
                            favorite_book_id, created_at, updated_at";

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "Email already registered"))
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                address1 = CASE WHEN $3 THEN $4 ELSE address1 END,
                address2 = CASE WHEN $5 THEN $6 ELSE address2 END,
                favorite_book_id = CASE WHEN $7 THEN $8 ELSE favorite_book_id END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(changes.full_name)
        .bind(changes.address1.is_some())
        .bind(changes.address1.flatten())
        .bind(changes.address2.is_some())
        .bind(changes.address2.flatten())
        .bind(changes.favorite_book_id.is_some())
        .bind(changes.favorite_book_id.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "Favorite book does not exist"))?
        .ok_or_else(|| StoreError::NotFound("User".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("User".to_string()))
    }
}
