//! HTTP route handlers for the e-shop API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Liveness check
//! GET    /health/ready        - Readiness check (probes database)
//!
//! GET    /items               - List items with stock levels
//! GET    /orders              - List orders with nested line items
//! POST   /new-order           - Place an order
//! DELETE /delete-order/{id}   - Delete an order, restoring stock
//! ```
//!
//! The order routes preserve the client contract as observed: both the
//! placement and the delete success respond with 201, and deleting an
//! unknown order id responds with 400.

pub mod items;
pub mod orders;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(items::list))
        .route("/orders", get(orders::list))
        .route("/new-order", post(orders::create))
        .route("/delete-order/{id}", delete(orders::remove))
}
