//! Order placement and reversal.
//!
//! Both operations are all-or-nothing: every statement runs inside one
//! `PostgreSQL` transaction, and returning an error before commit drops the
//! transaction, which rolls it back. No partial order or partial stock
//! mutation is ever observable.
//!
//! # Concurrency
//!
//! Placement reads each item row with `SELECT ... FOR UPDATE` before checking
//! stock, so two concurrent placements against the same item serialize at the
//! row lock: the check and the later decrement cannot be interleaved, and
//! stock can never be driven negative. Rows are locked in ascending item-id
//! order so that concurrent placements acquire locks in the same sequence.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use eshop_core::{Email, EmailError, ItemId, OrderId};

use crate::models::{Order, OrderItem};

/// One requested line of a new order.
#[derive(Debug, Clone, Copy)]
pub struct OrderLineRequest {
    pub item_id: ItemId,
    pub quantity: i32,
}

/// Errors from order placement and reversal.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// The contact email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The requested item list is empty.
    #[error("no items entered")]
    EmptyItems,

    /// A requested quantity is zero or negative.
    #[error("invalid quantity {quantity} for item {item_id}")]
    InvalidQuantity {
        item_id: ItemId,
        quantity: i32,
    },

    /// A requested item id does not exist.
    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    /// Requested quantity exceeds the available stock.
    #[error("not enough stock for item {0}")]
    InsufficientStock(ItemId),

    /// The order to reverse does not exist.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Database failure; the transaction was rolled back.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Service for the order lifecycle: placement and reversal.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: validate the request, check stock for every line,
    /// then atomically insert the order with its line items and decrement
    /// stock.
    ///
    /// The stock check runs for all lines before any mutation, so a shortfall
    /// on a later line aborts the whole order without side effects.
    ///
    /// # Errors
    ///
    /// - `InvalidEmail`, `EmptyItems`, `InvalidQuantity` - rejected before
    ///   any statement executes
    /// - `ItemNotFound`, `InsufficientStock` - rejected inside the
    ///   transaction, which rolls back
    /// - `Database` - any store failure; the transaction rolls back
    pub async fn place(
        &self,
        email: &str,
        lines: &[OrderLineRequest],
    ) -> Result<Order, OrderError> {
        let email = validate_request(email, lines)?;

        let mut tx = self.pool.begin().await?;

        // Lock every referenced item row up front, in ascending id order, and
        // read its stock under the lock.
        let mut ids: Vec<ItemId> = lines.iter().map(|l| l.item_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut stock: BTreeMap<ItemId, i32> = BTreeMap::new();
        for id in ids {
            let quantity = sqlx::query_scalar::<_, i32>(
                "SELECT quantity FROM items WHERE id = $1 FOR UPDATE",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(OrderError::ItemNotFound(id))?;
            stock.insert(id, quantity);
        }

        // All lines are checked before the first mutation.
        for line in lines {
            let available = stock
                .get(&line.item_id)
                .copied()
                .ok_or(OrderError::ItemNotFound(line.item_id))?;
            if line.quantity > available {
                return Err(OrderError::InsufficientStock(line.item_id));
            }
        }

        let (order_id, created_at) = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            "INSERT INTO orders (email) VALUES ($1) RETURNING id, created_at",
        )
        .bind(email.as_str())
        .fetch_one(&mut *tx)
        .await?;
        let order_id = OrderId::new(order_id);

        for line in lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, item_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(order_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            // The guard re-states the stock check at the point of mutation.
            // With the rows locked above it can only miss when one request
            // lists the same item twice and overdraws in aggregate.
            let result = sqlx::query(
                "UPDATE items SET quantity = quantity - $1 WHERE id = $2 AND quantity >= $1",
            )
            .bind(line.quantity)
            .bind(line.item_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(OrderError::InsufficientStock(line.item_id));
            }
        }

        tx.commit().await?;

        tracing::info!(order_id = %order_id, lines = lines.len(), "Order placed");
        Ok(Order {
            id: order_id,
            email,
            created_at,
        })
    }

    /// Reverse (delete) an order: restore stock for each line item, then
    /// delete the line items and the order, all atomically.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` - no order with this id exists
    /// - `Database` - any store failure; the transaction rolls back and no
    ///   partial stock restoration is observable
    pub async fn reverse(&self, order_id: OrderId) -> Result<(), OrderError> {
        let mut tx = self.pool.begin().await?;

        // Lock the order row so a concurrent reversal of the same order
        // cannot restore stock twice.
        sqlx::query_scalar::<_, i32>("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        let lines = sqlx::query_as::<_, OrderItem>(
            "SELECT order_id, item_id, quantity FROM order_items WHERE order_id = $1 ORDER BY item_id ASC",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query("UPDATE items SET quantity = quantity + $1 WHERE id = $2")
                .bind(line.quantity)
                .bind(line.item_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, lines = lines.len(), "Order reversed");
        Ok(())
    }
}

/// Validate an order request before touching the database.
///
/// Returns the parsed email on success.
fn validate_request(email: &str, lines: &[OrderLineRequest]) -> Result<Email, OrderError> {
    let email = Email::parse(email)?;

    if lines.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    for line in lines {
        if line.quantity <= 0 {
            return Err(OrderError::InvalidQuantity {
                item_id: line.item_id,
                quantity: line.quantity,
            });
        }
    }

    Ok(email)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(item_id: i32, quantity: i32) -> OrderLineRequest {
        OrderLineRequest {
            item_id: ItemId::new(item_id),
            quantity,
        }
    }

    #[test]
    fn test_validate_request_ok() {
        let email = validate_request("buyer@example.com", &[line(1, 2), line(2, 1)]).unwrap();
        assert_eq!(email.as_str(), "buyer@example.com");
    }

    #[test]
    fn test_validate_request_invalid_email() {
        let err = validate_request("not-an-email", &[line(1, 2)]).unwrap_err();
        assert!(matches!(err, OrderError::InvalidEmail(_)));
    }

    #[test]
    fn test_validate_request_empty_items() {
        let err = validate_request("buyer@example.com", &[]).unwrap_err();
        assert!(matches!(err, OrderError::EmptyItems));
    }

    #[test]
    fn test_validate_request_zero_quantity() {
        let err = validate_request("buyer@example.com", &[line(1, 0)]).unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidQuantity { quantity: 0, .. }
        ));
    }

    #[test]
    fn test_validate_request_negative_quantity() {
        let err = validate_request("buyer@example.com", &[line(1, 2), line(2, -3)]).unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidQuantity { quantity: -3, .. }
        ));
    }

    #[test]
    fn test_validate_email_checked_before_items() {
        // Both are invalid; the email failure is reported first.
        let err = validate_request("not-an-email", &[]).unwrap_err();
        assert!(matches!(err, OrderError::InvalidEmail(_)));
    }

    #[test]
    fn test_order_error_display() {
        let err = OrderError::InsufficientStock(ItemId::new(4));
        assert_eq!(err.to_string(), "not enough stock for item 4");

        let err = OrderError::OrderNotFound(OrderId::new(9));
        assert_eq!(err.to_string(), "order 9 not found");
    }
}
