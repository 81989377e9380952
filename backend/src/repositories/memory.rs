//! In-process store
//!
//! Implements every store trait over plain collections behind one lock.
//! Used by the test suites and by `storage.backend = "memory"` for running
//! the API without PostgreSQL. Uniqueness rules match the database schema.

use super::{
    BookStore, CategoryStore, NewUser, OrderStore, ProfileChanges, StoreError, UserRecord, UserStore,
};
use async_trait::async_trait;
use chrono::Utc;
use keep_reading_shared::{Book, Category, CreateBookInput, CreateCategoryInput, Order, UpdateBookInput};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    books: Vec<Book>,
    categories: Vec<Category>,
    orders: Vec<Order>,
}

/// Store backed by in-memory tables
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placed order. Orders are read-only through the API.
    pub async fn insert_order(&self, order: Order) {
        self.tables.write().await.orders.push(order);
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            role: user.role.as_str().to_string(),
            address1: None,
            address2: None,
            favorite_book_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut users = self.tables.read().await.users.clone();
        newest_first(&mut users, |u| u.created_at);
        Ok(users)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(Some(book_id)) = changes.favorite_book_id {
            if !tables.books.iter().any(|b| b.id == book_id) {
                return Err(StoreError::Conflict("Favorite book does not exist".to_string()));
            }
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound("User".to_string()))?;

        if let Some(full_name) = changes.full_name {
            user.full_name = full_name;
        }
        if let Some(address1) = changes.address1 {
            user.address1 = address1;
        }
        if let Some(address2) = changes.address2 {
            user.address2 = address2;
        }
        if let Some(book_id) = changes.favorite_book_id {
            user.favorite_book_id = book_id;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound("User".to_string()))?;

        tables.orders.retain(|o| o.user_id != id);
        Ok(tables.users.remove(index))
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let mut books = self.tables.read().await.books.clone();
        newest_first(&mut books, |b| b.created_at);
        Ok(books)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().find(|b| b.isbn == isbn).cloned())
    }

    async fn create(&self, input: CreateBookInput) -> Result<Book, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.books.iter().any(|b| b.isbn == input.isbn) {
            return Err(StoreError::Conflict("A book with this ISBN already exists".to_string()));
        }

        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: input.title,
            author: input.author,
            description: input.description,
            price: input.price,
            isbn: input.isbn,
            cover_image: input.cover_image,
            category: input.category,
            stock: input.stock,
            published: input.published,
            created_at: now,
            updated_at: now,
        };
        tables.books.push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: Uuid, changes: UpdateBookInput) -> Result<Book, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(isbn) = &changes.isbn {
            if tables.books.iter().any(|b| b.id != id && &b.isbn == isbn) {
                return Err(StoreError::Conflict("A book with this ISBN already exists".to_string()));
            }
        }

        let book = tables
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound("Book".to_string()))?;

        if let Some(title) = changes.title {
            book.title = title;
        }
        if let Some(author) = changes.author {
            book.author = author;
        }
        if let Some(description) = changes.description {
            book.description = Some(description);
        }
        if let Some(price) = changes.price {
            book.price = price;
        }
        if let Some(isbn) = changes.isbn {
            book.isbn = isbn;
        }
        if let Some(cover_image) = changes.cover_image {
            book.cover_image = Some(cover_image);
        }
        if let Some(category) = changes.category {
            book.category = category;
        }
        if let Some(stock) = changes.stock {
            book.stock = stock;
        }
        if let Some(published) = changes.published {
            book.published = published;
        }
        book.updated_at = Utc::now();
        Ok(book.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Book, StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound("Book".to_string()))?;

        let referenced = tables
            .orders
            .iter()
            .any(|o| o.items.iter().any(|i| i.book_id == id));
        if referenced {
            return Err(StoreError::Conflict("Book is referenced by existing orders".to_string()));
        }

        for user in tables.users.iter_mut() {
            if user.favorite_book_id == Some(id) {
                user.favorite_book_id = None;
            }
        }
        Ok(tables.books.remove(index))
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.tables.read().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, input: CreateCategoryInput) -> Result<Category, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.categories.iter().any(|c| c.slug == input.slug) {
            return Err(StoreError::Conflict(
                "A category with this slug already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: input.name,
            slug: input.slug,
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<Category, StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound("Category".to_string()))?;
        Ok(tables.categories.remove(index))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .tables
            .read()
            .await
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut orders, |o| o.created_at);
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use keep_reading_shared::{BookSummary, OrderItem, OrderStatus, Role};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$2b$04$digest".to_string(),
            full_name: "Avid Reader".to_string(),
            role: Role::User,
        }
    }

    fn book_input(isbn: &str) -> CreateBookInput {
        CreateBookInput {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: None,
            price: 9.99,
            isbn: isbn.to_string(),
            cover_image: None,
            category: "sci-fi".to_string(),
            stock: 3,
            published: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@b.com")).await.unwrap();

        let err = UserStore::create(&store, new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(UserStore::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@b.com")).await.unwrap();
        assert!(UserStore::create(&store, new_user("A@b.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_one_record() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                UserStore::create(&*store, new_user("race@b.com")).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_profile_update_keeps_absent_fields() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, new_user("a@b.com")).await.unwrap();

        let updated = store
            .update_profile(
                user.id,
                ProfileChanges {
                    address1: Some(Some("1 Library Lane".to_string())),
                    address2: Some(Some("Flat 3".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name, "Avid Reader");
        assert_eq!(updated.address1.as_deref(), Some("1 Library Lane"));

        let cleared = store
            .update_profile(
                user.id,
                ProfileChanges {
                    address1: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(cleared.address1, None);
        assert_eq!(cleared.address2.as_deref(), Some("Flat 3"));
    }

    #[tokio::test]
    async fn test_isbn_unique_across_update() {
        let store = MemoryStore::new();
        BookStore::create(&store, book_input("111")).await.unwrap();
        let second = BookStore::create(&store, book_input("222")).await.unwrap();

        let err = store
            .update(
                second.id,
                UpdateBookInput {
                    isbn: Some("111".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_ordered_book_cannot_be_deleted() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, new_user("a@b.com")).await.unwrap();
        let book = BookStore::create(&store, book_input("111")).await.unwrap();
        store
            .insert_order(Order {
                id: Uuid::new_v4(),
                user_id: user.id,
                status: OrderStatus::Paid,
                total: book.price,
                created_at: Utc::now(),
                items: vec![OrderItem {
                    id: Uuid::new_v4(),
                    book_id: book.id,
                    quantity: 1,
                    unit_price: book.price,
                    book: BookSummary::from(&book),
                }],
            })
            .await;

        assert!(matches!(
            BookStore::delete(&store, book.id).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(store.list_for_user(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let store = MemoryStore::new();
        for (name, slug) in [("Poetry", "poetry"), ("Fantasy", "fantasy"), ("History", "history")] {
            CategoryStore::create(
                &store,
                CreateCategoryInput {
                    name: name.to_string(),
                    slug: slug.to_string(),
                },
            )
            .await
            .unwrap();
        }

        let names: Vec<String> = CategoryStore::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Fantasy", "History", "Poetry"]);
    }
}
