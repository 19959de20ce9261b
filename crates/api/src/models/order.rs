//! Order and line item models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use eshop_core::{Email, ItemId, OrderId};

/// A customer order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// A line item: how much of item X was in order Y.
///
/// Lifecycle is bound to the parent order - a line item never exists without
/// one and never outlives it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub item_id: ItemId,
    pub quantity: i32,
}

/// A line item resolved against the items table (name instead of id).
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineDetail {
    pub item_name: String,
    pub item_quantity: i32,
}

/// An order with its resolved line items, as returned by the order listing.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    pub order_id: OrderId,
    pub email: Email,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderLineDetail>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_with_items_json_shape() {
        let order = OrderWithItems {
            order_id: OrderId::new(3),
            email: Email::parse("buyer@example.com").unwrap(),
            order_date: DateTime::parse_from_rfc3339("2026-08-15T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            items: vec![OrderLineDetail {
                item_name: "Keyboard".to_string(),
                item_quantity: 2,
            }],
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["order_id"], 3);
        assert_eq!(json["email"], "buyer@example.com");
        assert!(json["order_date"].is_string());
        assert_eq!(json["items"][0]["item_name"], "Keyboard");
        assert_eq!(json["items"][0]["item_quantity"], 2);
    }
}
