//! User service - profile and account administration

use crate::error::ApiError;
use crate::repositories::{BookStore, OrderStore, ProfileChanges, UserStore};
use keep_reading_shared::types::UpdateProfileInput;
use keep_reading_shared::validation::validate_profile_update;
use keep_reading_shared::{Order, PublicUser, ValidationError};
use tracing::info;
use uuid::Uuid;

/// User service for profile and administration operations
pub struct UserService;

impl UserService {
    /// Public projection of one user, `None` when the id is unknown
    pub async fn get_user(users: &dyn UserStore, id: Uuid) -> Result<Option<PublicUser>, ApiError> {
        Ok(users.find_by_id(id).await?.map(|u| u.to_public()))
    }

    /// All users, newest first
    pub async fn list_users(users: &dyn UserStore) -> Result<Vec<PublicUser>, ApiError> {
        Ok(users.list().await?.iter().map(|u| u.to_public()).collect())
    }

    /// Apply a partial profile update for `user_id`
    ///
    /// A `favoriteBookId` must name an existing book. Explicit nulls clear
    /// the optional fields.
    pub async fn update_profile(
        users: &dyn UserStore,
        books: &dyn BookStore,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<PublicUser, ApiError> {
        validate_profile_update(&input)?;

        if let Some(Some(book_id)) = input.favorite_book_id {
            if books.find_by_id(book_id).await?.is_none() {
                return Err(ValidationError::field("favoriteBookId", "Favorite book does not exist").into());
            }
        }

        let changes = ProfileChanges {
            full_name: input.full_name.map(|n| n.trim().to_string()),
            address1: input.address1,
            address2: input.address2,
            favorite_book_id: input.favorite_book_id,
        };

        let user = users.update_profile(user_id, changes).await?;
        info!(user_id = %user.id, "Profile updated");
        Ok(user.to_public())
    }

    /// Delete an account and its orders
    pub async fn delete_user(users: &dyn UserStore, id: Uuid) -> Result<PublicUser, ApiError> {
        let user = users.delete(id).await?;
        info!(user_id = %user.id, "User deleted");
        Ok(user.to_public())
    }

    /// Order history of `user_id`, newest first
    pub async fn orders(orders: &dyn OrderStore, user_id: Uuid) -> Result<Vec<Order>, ApiError> {
        Ok(orders.list_for_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MemoryStore, NewUser};
    use keep_reading_shared::Role;

    async fn seeded() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let user = UserStore::create(
            &store,
            NewUser {
                email: "reader@example.com".to_string(),
                password_hash: "$2b$04$digest".to_string(),
                full_name: "Reader".to_string(),
                role: Role::User,
            },
        )
        .await
        .unwrap();
        (store, user.id)
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let (store, id) = seeded().await;

        let updated = UserService::update_profile(
            &store,
            &store,
            id,
            UpdateProfileInput {
                address1: Some(Some("1 Library Lane".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.full_name, "Reader");
        assert_eq!(updated.address1.as_deref(), Some("1 Library Lane"));
    }

    #[tokio::test]
    async fn test_unknown_favorite_book_is_rejected() {
        let (store, id) = seeded().await;

        let err = UserService::update_profile(
            &store,
            &store,
            id,
            UpdateProfileInput {
                favorite_book_id: Some(Some(Uuid::new_v4())),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_none() {
        let store = MemoryStore::new();
        assert!(UserService::get_user(&store, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = UserService::delete_user(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
