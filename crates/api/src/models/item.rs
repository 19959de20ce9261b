//! Stocked item model.

use serde::Serialize;
use sqlx::FromRow;

use eshop_core::ItemId;

/// A stocked product.
///
/// `quantity` is the stock on hand. It is decremented by order placement and
/// incremented by order reversal, and must never be negative (enforced both
/// by the placement logic and a database CHECK constraint).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_json_shape() {
        let item = Item {
            id: ItemId::new(1),
            name: "Keyboard".to_string(),
            quantity: 12,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Keyboard", "quantity": 12})
        );
    }
}
