//! Domain models backed by the `PostgreSQL` schema.

pub mod item;
pub mod order;

pub use item::Item;
pub use order::{Order, OrderItem, OrderLineDetail, OrderWithItems};
