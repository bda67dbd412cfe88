//! REST API handlers for shopping cart operations
//!
//! Every endpoint resolves the caller's cart session from its cookie,
//! applies the operation, and answers with the resulting cart view.

use super::{helpers::*, models::*};
use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_item))
        .route(
            "/api/cart/items/:product_id",
            put(update_item).delete(remove_item),
        )
        .route("/api/cart/sync", post(sync_cart))
}

fn cart_response(view: CartView, session_id: &str, is_new_session: bool) -> Response {
    with_session_cookie(Json(view).into_response(), session_id, is_new_session)
}

/// Endpoint: GET /api/cart
async fn get_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let view = state.carts.view(&session_id);
    cart_response(view, &session_id, is_new_session)
}

/// Endpoint: POST /api/cart/items
/// Looks the product up in the catalog, then adds one unit of it.
async fn add_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<AddItemInput>,
) -> ApiResult<Response> {
    let (session_id, is_new_session) = resolve_session_id(&headers);

    let product = state
        .catalog
        .find(&payload.product_id)
        .await
        .map_err(ApiError::catalog("Failed to fetch product"))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let view = state.carts.with_cart(&session_id, |cart| {
        cart.add_to_cart(product);
        cart.view()
    });

    Ok(cart_response(view, &session_id, is_new_session))
}

/// Endpoint: PUT /api/cart/items/:product_id
async fn update_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateQuantityInput>,
) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let view = state.carts.with_cart(&session_id, |cart| {
        cart.update_quantity(&product_id, payload.quantity);
        cart.view()
    });
    cart_response(view, &session_id, is_new_session)
}

/// Endpoint: DELETE /api/cart/items/:product_id
async fn remove_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let view = state.carts.with_cart(&session_id, |cart| {
        cart.remove_from_cart(&product_id);
        cart.view()
    });
    cart_response(view, &session_id, is_new_session)
}

/// Endpoint: DELETE /api/cart
async fn clear_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let view = state.carts.with_cart(&session_id, |cart| {
        if !cart.is_empty() {
            let summary = format_item_summary(cart.items());
            tracing::info!(session = %session_id, "Clearing cart: {}", summary);
        }
        cart.clear_cart();
        cart.view()
    });
    cart_response(view, &session_id, is_new_session)
}

/// Endpoint: POST /api/cart/sync
/// Replaces the session's cart with the client's copy. Every product is
/// resolved from the catalog first; one unknown id rejects the whole sync.
async fn sync_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SyncCartInput>,
) -> ApiResult<Response> {
    let (session_id, is_new_session) = resolve_session_id(&headers);

    let mut lines = Vec::with_capacity(payload.items.len());
    for item in payload.items {
        let product = state
            .catalog
            .find(&item.product_id)
            .await
            .map_err(ApiError::catalog("Failed to fetch product"))?
            .ok_or_else(|| ApiError::not_found("Product not found"))?;
        lines.push(CartLine::new(product, item.quantity));
    }

    let view = state.carts.with_cart(&session_id, |cart| {
        cart.replace_lines(lines);
        cart.view()
    });
    Ok(cart_response(view, &session_id, is_new_session))
}
