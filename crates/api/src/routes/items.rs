//! Item route handlers.

use axum::{Json, extract::State};

use crate::db::ItemRepository;
use crate::error::Result;
use crate::models::Item;
use crate::state::AppState;

/// List all items with their current stock levels.
///
/// GET /items
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    let items = ItemRepository::new(state.pool()).list_all().await?;
    Ok(Json(items))
}
