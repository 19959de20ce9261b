//! Integration tests for the e-shop API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply the schema
//! cargo run -p eshop-cli -- migrate
//!
//! # Start the API
//! cargo run -p eshop-api
//!
//! # Run integration tests
//! cargo test -p eshop-integration-tests -- --ignored
//! ```
//!
//! Tests talk to the running server over HTTP (`ESHOP_BASE_URL`, default
//! `http://localhost:3000`) and create their fixtures directly in the
//! database (`ESHOP_DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("ESHOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Connect to the test database.
///
/// Reads `ESHOP_DATABASE_URL` (falling back to `DATABASE_URL`), the same
/// variables the API itself uses.
pub async fn test_pool() -> PgPool {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ESHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .expect("ESHOP_DATABASE_URL not set");

    PgPool::connect(database_url.expose_secret())
        .await
        .expect("Failed to connect to test database")
}

/// Insert an item fixture and return its id.
pub async fn seed_item(pool: &PgPool, name: &str, quantity: i32) -> i32 {
    sqlx::query_scalar("INSERT INTO items (name, quantity) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(quantity)
        .fetch_one(pool)
        .await
        .expect("Failed to seed item")
}

/// Read an item's current stock level.
pub async fn item_quantity(pool: &PgPool, id: i32) -> i32 {
    sqlx::query_scalar("SELECT quantity FROM items WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read item quantity")
}

/// Remove an item fixture. Any orders referencing it must be gone first.
pub async fn remove_item(pool: &PgPool, id: i32) {
    sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("Failed to remove item fixture");
}
