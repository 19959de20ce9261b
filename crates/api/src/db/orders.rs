//! Order repository for database operations.
//!
//! Read queries only. The transactional placement and reversal paths live in
//! [`crate::services::orders`], which owns the transaction scope.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use eshop_core::{Email, OrderId};

use super::RepositoryError;
use crate::models::{OrderLineDetail, OrderWithItems};

/// One row of the order listing join: an order paired with one of its line
/// items (or none, for an order without line items).
#[derive(Debug, FromRow)]
struct OrderListingRow {
    id: i32,
    email: String,
    created_at: DateTime<Utc>,
    item_name: Option<String>,
    item_quantity: Option<i32>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders with their line items resolved to item names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list_with_items(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderListingRow>(
            r"
            SELECT o.id, o.email, o.created_at,
                   i.name AS item_name,
                   oi.quantity AS item_quantity
            FROM orders o
            LEFT JOIN order_items oi ON oi.order_id = o.id
            LEFT JOIN items i ON i.id = oi.item_id
            ORDER BY o.id ASC, oi.id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        // Rows arrive grouped by order id; fold consecutive rows into one
        // order with its nested line items.
        let mut orders: Vec<OrderWithItems> = Vec::new();
        for row in rows {
            let order_id = OrderId::new(row.id);
            let matches_last = orders.last().is_some_and(|o| o.order_id == order_id);

            if !matches_last {
                let email = Email::parse(&row.email).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })?;
                orders.push(OrderWithItems {
                    order_id,
                    email,
                    order_date: row.created_at,
                    items: Vec::new(),
                });
            }

            if let (Some(item_name), Some(item_quantity)) = (row.item_name, row.item_quantity)
                && let Some(order) = orders.last_mut()
            {
                order.items.push(OrderLineDetail {
                    item_name,
                    item_quantity,
                });
            }
        }

        Ok(orders)
    }
}
