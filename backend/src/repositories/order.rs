//! Order history repository

use super::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keep_reading_shared::{BookSummary, Order, OrderItem, OrderStatus};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRecord {
    id: Uuid,
    user_id: Uuid,
    status: String,
    total: f64,
    created_at: DateTime<Utc>,
}

/// Order line joined with its book
#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    book_id: Uuid,
    quantity: i32,
    unit_price: f64,
    title: String,
    author: String,
    cover_image: Option<String>,
}

/// Read access to placed orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders placed by `user_id`, newest first, with their lines
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreError>;
}

/// PostgreSQL-backed order store
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreError> {
        let orders = sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT id, user_id, status, total, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT oi.id, oi.order_id, oi.book_id, oi.quantity, oi.unit_price,
                   b.title, b.author, b.cover_image
            FROM order_items oi
            JOIN books b ON b.id = oi.book_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.created_at ASC
            "#,
        )
        .bind(&order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            items.entry(row.order_id).or_default().push(OrderItem {
                id: row.id,
                book_id: row.book_id,
                quantity: row.quantity,
                unit_price: row.unit_price,
                book: BookSummary {
                    id: row.book_id,
                    title: row.title,
                    author: row.author,
                    cover_image: row.cover_image,
                },
            });
        }

        Ok(orders
            .into_iter()
            .map(|o| {
                let status = o.status.parse().unwrap_or_else(|e| {
                    warn!(order_id = %o.id, error = %e, "Unknown order status");
                    OrderStatus::Pending
                });
                Order {
                    id: o.id,
                    user_id: o.user_id,
                    status,
                    total: o.total,
                    created_at: o.created_at,
                    items: items.remove(&o.id).unwrap_or_default(),
                }
            })
            .collect())
    }
}
