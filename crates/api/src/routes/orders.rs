//! Order route handlers.
//!
//! JSON endpoints for listing, placing, and deleting orders. Placement and
//! deletion delegate to [`OrderService`], which owns the transaction scope.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use eshop_core::{ItemId, OrderId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::OrderWithItems;
use crate::services::{OrderLineRequest, OrderService};
use crate::state::AppState;

/// One line of a new-order request: `{"id": 1, "quantity": 2}`.
#[derive(Debug, Deserialize)]
pub struct NewOrderLine {
    pub id: ItemId,
    pub quantity: i32,
}

/// Request body for POST /new-order.
#[derive(Debug, Deserialize)]
pub struct NewOrderRequest {
    pub email: String,
    pub items: Vec<NewOrderLine>,
}

/// Response body for a successful placement.
#[derive(Debug, Serialize)]
pub struct NewOrderResponse {
    pub message: String,
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}

/// Response body for a successful deletion.
#[derive(Debug, Serialize)]
pub struct DeleteOrderResponse {
    pub message: String,
    pub id: OrderId,
}

/// List all orders with their line items.
///
/// GET /orders
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderWithItems>>> {
    let orders = OrderRepository::new(state.pool()).list_with_items().await?;
    Ok(Json(orders))
}

/// Place a new order.
///
/// POST /new-order
///
/// Responds 201 with `{message, orderId}` on success; 400 for invalid input
/// or insufficient stock; 404 for an unknown item id; 500 on store failure.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a body that does not deserialize, or
/// `AppError::Order` describing the failed validation or stock check.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NewOrderResponse>)> {
    // A body that fails to deserialize (missing email, items not an array)
    // is invalid input under the contract: 400, not the extractor's default
    // rejection status.
    let Json(body) = body.map_err(|_| AppError::BadRequest("Invalid request body".to_string()))?;

    let lines: Vec<OrderLineRequest> = body
        .items
        .iter()
        .map(|line| OrderLineRequest {
            item_id: line.id,
            quantity: line.quantity,
        })
        .collect();

    let order = OrderService::new(state.pool())
        .place(&body.email, &lines)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NewOrderResponse {
            message: "Order placed successfully".to_string(),
            order_id: order.id,
        }),
    ))
}

/// Delete an order, restoring stock for each of its line items.
///
/// DELETE /delete-order/{id}
///
/// Responds 201 with `{message, id}` on success; 400 for an unknown order id;
/// 500 on store failure.
///
/// # Errors
///
/// Returns `AppError::Order` if the order does not exist or the store fails.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<DeleteOrderResponse>)> {
    let order_id = OrderId::new(id);

    OrderService::new(state.pool()).reverse(order_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(DeleteOrderResponse {
            message: "Order deleted successfully".to_string(),
            id: order_id,
        }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_request_deserialization() {
        let body: NewOrderRequest = serde_json::from_str(
            r#"{"email": "buyer@example.com", "items": [{"id": 1, "quantity": 2}, {"id": 2, "quantity": 1}]}"#,
        )
        .unwrap();

        assert_eq!(body.email, "buyer@example.com");
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.items[0].id, ItemId::new(1));
        assert_eq!(body.items[0].quantity, 2);
    }

    #[test]
    fn test_new_order_response_uses_camel_case_order_id() {
        let response = NewOrderResponse {
            message: "Order placed successfully".to_string(),
            order_id: OrderId::new(7),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["orderId"], 7);
        assert_eq!(json["message"], "Order placed successfully");
    }

    #[tokio::test]
    async fn test_undeserializable_body_maps_to_bad_request() {
        use axum::body::Body;
        use axum::http::{Request, header};
        use tower::ServiceExt;

        use crate::config::ApiConfig;
        use crate::state::AppState;

        // connect_lazy opens no connection; these requests are rejected
        // before any query runs.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/eshop")
            .unwrap();
        let config = ApiConfig {
            database_url: secrecy::SecretString::from("postgres://localhost/eshop"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            sentry_dsn: None,
        };
        let app = crate::routes::routes().with_state(AppState::new(config, pool));

        for body in [
            // items is not an array
            r#"{"email": "a@b.co", "items": "nope"}"#,
            // email missing entirely
            r#"{"items": [{"id": 1, "quantity": 1}]}"#,
            // not JSON at all
            "not json",
        ] {
            let request = Request::builder()
                .method("POST")
                .uri("/new-order")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();

            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }
    }

    #[test]
    fn test_delete_order_response_shape() {
        let response = DeleteOrderResponse {
            message: "Order deleted successfully".to_string(),
            id: OrderId::new(3),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["message"], "Order deleted successfully");
    }
}
