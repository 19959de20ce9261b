//! Business logic services.

pub mod orders;

pub use orders::{OrderError, OrderLineRequest, OrderService};
