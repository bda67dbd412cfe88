//! REST API handlers for the product catalog

use super::models::{Product, ProductQuery};
use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

/// Cap on `/api/products/search` results
pub const SEARCH_LIMIT: usize = 20;

/// Creates routes for catalog queries
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/search", get(search_products))
        .route("/api/products/categories", get(list_categories))
        .route("/api/products/:id", get(get_product))
}

/// Endpoint: GET /api/products?q=&category=
async fn list_products(
    State(state): State<SharedState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .search(&query)
        .await
        .map_err(ApiError::catalog("Failed to fetch products"))?;
    Ok(Json(products))
}

/// Endpoint: GET /api/products/search?q=
/// A missing or blank keyword returns no results rather than the whole catalog.
async fn search_products(
    State(state): State<SharedState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let Some(keyword) = query.normalized_query() else {
        return Ok(Json(Vec::new()));
    };

    let products = state
        .catalog
        .search(&ProductQuery::keyword(keyword).with_limit(SEARCH_LIMIT))
        .await
        .map_err(ApiError::catalog("Failed to search products"))?;
    Ok(Json(products))
}

/// Endpoint: GET /api/products/categories
async fn list_categories(State(state): State<SharedState>) -> ApiResult<Json<Vec<String>>> {
    let categories = state
        .catalog
        .categories()
        .await
        .map_err(ApiError::catalog("Failed to fetch categories"))?;
    Ok(Json(categories))
}

/// Endpoint: GET /api/products/:id
async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    state
        .catalog
        .find(&id)
        .await
        .map_err(ApiError::catalog("Failed to fetch product"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product not found"))
}
