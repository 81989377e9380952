//! Category service

use crate::error::ApiError;
use crate::repositories::CategoryStore;
use keep_reading_shared::types::CreateCategoryInput;
use keep_reading_shared::validation::validate_create_category;
use keep_reading_shared::Category;
use tracing::info;
use uuid::Uuid;

pub struct CategoryService;

impl CategoryService {
    /// All categories ordered by name
    pub async fn list(categories: &dyn CategoryStore) -> Result<Vec<Category>, ApiError> {
        Ok(categories.list().await?)
    }

    pub async fn get(categories: &dyn CategoryStore, id: Uuid) -> Result<Option<Category>, ApiError> {
        Ok(categories.find_by_id(id).await?)
    }

    pub async fn create(
        categories: &dyn CategoryStore,
        input: CreateCategoryInput,
    ) -> Result<Category, ApiError> {
        let input = CreateCategoryInput {
            name: input.name.trim().to_string(),
            slug: input.slug.trim().to_string(),
        };
        validate_create_category(&input)?;

        let category = categories.create(input).await?;
        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn delete(categories: &dyn CategoryStore, id: Uuid) -> Result<Category, ApiError> {
        let category = categories.delete(id).await?;
        info!(category_id = %category.id, "Category deleted");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use rstest::rstest;

    fn input(name: &str, slug: &str) -> CreateCategoryInput {
        CreateCategoryInput {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_categories_are_listed_by_name() {
        let store = MemoryStore::new();
        CategoryService::create(&store, input("Poetry", "poetry")).await.unwrap();
        CategoryService::create(&store, input("History", "history")).await.unwrap();

        let names: Vec<_> = CategoryService::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["History", "Poetry"]);
    }

    #[rstest]
    #[case("Science Fiction")]
    #[case("sci--fi")]
    #[case("")]
    #[tokio::test]
    async fn test_bad_slugs_are_rejected(#[case] slug: &str) {
        let store = MemoryStore::new();
        let err = CategoryService::create(&store, input("Sci-Fi", slug)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let store = MemoryStore::new();
        CategoryService::create(&store, input("Poetry", "poetry")).await.unwrap();

        let err = CategoryService::create(&store, input("Verse", "poetry")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let store = MemoryStore::new();
        let err = CategoryService::delete(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
