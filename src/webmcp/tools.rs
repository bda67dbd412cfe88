//! Storefront tools
//!
//! Catalog search and cart operations exposed to an agent. Catalog failures
//! and unknown product ids come back as error-flagged responses rather than
//! tool failures, so the agent sees them as ordinary results.

use super::{
    registry::{ModelContext, RegistryError},
    schema::Schema,
    tool::{ModelContextClient, Tool, ToolError, ToolHandler, ToolResponse},
};
use crate::cart::CartSessions;
use crate::catalog::{CatalogStore, ProductQuery};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub const SEARCH_PRODUCTS: &str = "search_products";
pub const GET_CATEGORIES: &str = "get_categories";
pub const GET_PRODUCT_DETAILS: &str = "get_product_details";
pub const ADD_TO_CART: &str = "add_to_cart";
pub const REMOVE_FROM_CART: &str = "remove_from_cart";
pub const GET_CART: &str = "get_cart";
pub const CLEAR_CART: &str = "clear_cart";

/// String argument, or `None` when absent, blank or not a string.
fn str_arg<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn id_schema(description: &str) -> Schema {
    Schema::object()
        .property("id", Schema::string().describe(description))
        .required(["id"])
}

// =============================================================================
// Catalog tools
// =============================================================================

struct SearchProducts {
    catalog: Arc<dyn CatalogStore>,
}

#[async_trait]
impl ToolHandler for SearchProducts {
    async fn execute(
        &self,
        input: Value,
        _: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError> {
        let query = ProductQuery {
            query: str_arg(&input, "query").map(str::to_string),
            category: str_arg(&input, "category").map(str::to_string),
            limit: None,
        };
        match self.catalog.search(&query).await {
            Ok(products) => Ok(ToolResponse::ok(&products)?),
            Err(e) => {
                tracing::warn!(error = %e, "Product search failed");
                Ok(ToolResponse::error("Failed to search products"))
            }
        }
    }
}

struct GetCategories {
    catalog: Arc<dyn CatalogStore>,
}

#[async_trait]
impl ToolHandler for GetCategories {
    async fn execute(&self, _: Value, _: &ModelContextClient) -> Result<ToolResponse, ToolError> {
        match self.catalog.categories().await {
            Ok(categories) => Ok(ToolResponse::ok(&categories)?),
            Err(e) => {
                tracing::warn!(error = %e, "Category listing failed");
                Ok(ToolResponse::error("Failed to fetch categories"))
            }
        }
    }
}

struct GetProductDetails {
    catalog: Arc<dyn CatalogStore>,
}

#[async_trait]
impl ToolHandler for GetProductDetails {
    async fn execute(
        &self,
        input: Value,
        _: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError> {
        let id = str_arg(&input, "id").unwrap_or_default();
        match self.catalog.find(id).await {
            Ok(Some(product)) => Ok(ToolResponse::ok(&product)?),
            Ok(None) => Ok(ToolResponse::error("Product not found")),
            Err(e) => {
                tracing::warn!(error = %e, product = id, "Product lookup failed");
                Ok(ToolResponse::error("Product not found"))
            }
        }
    }
}

// =============================================================================
// Cart tools
// =============================================================================

struct AddToCart {
    catalog: Arc<dyn CatalogStore>,
    carts: Arc<CartSessions>,
}

#[async_trait]
impl ToolHandler for AddToCart {
    async fn execute(
        &self,
        input: Value,
        client: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError> {
        let id = str_arg(&input, "id").unwrap_or_default();
        let product = match self.catalog.find(id).await {
            Ok(Some(product)) => product,
            Ok(None) => return Ok(ToolResponse::error("Product not found")),
            Err(e) => {
                tracing::warn!(error = %e, product = id, "Product lookup failed");
                return Ok(ToolResponse::error("Product not found"));
            }
        };

        let name = product.name.clone();
        self.carts.with_cart(client.session_id(), |cart| cart.add_to_cart(product));
        Ok(ToolResponse::ok(&json!({ "success": true, "product": name }))?)
    }
}

struct RemoveFromCart {
    carts: Arc<CartSessions>,
}

#[async_trait]
impl ToolHandler for RemoveFromCart {
    async fn execute(
        &self,
        input: Value,
        client: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError> {
        let id = str_arg(&input, "id").unwrap_or_default();
        self.carts.with_cart(client.session_id(), |cart| cart.remove_from_cart(id));
        Ok(ToolResponse::ok(&json!({ "success": true }))?)
    }
}

struct GetCart {
    carts: Arc<CartSessions>,
}

#[async_trait]
impl ToolHandler for GetCart {
    async fn execute(
        &self,
        _: Value,
        client: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError> {
        let view = self.carts.view(client.session_id());
        Ok(ToolResponse::ok(&view)?)
    }
}

struct ClearCart {
    carts: Arc<CartSessions>,
}

#[async_trait]
impl ToolHandler for ClearCart {
    async fn execute(
        &self,
        _: Value,
        client: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError> {
        self.carts.with_cart(client.session_id(), |cart| cart.clear_cart());
        Ok(ToolResponse::ok(&json!({ "success": true }))?)
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Builds the storefront tool set.
pub fn storefront_tools(catalog: Arc<dyn CatalogStore>, carts: Arc<CartSessions>) -> Vec<Tool> {
    vec![
        Tool::new(
            SEARCH_PRODUCTS,
            "Search products by keyword and/or category. Returns matching products.",
            SearchProducts {
                catalog: catalog.clone(),
            },
        )
        .with_input_schema(
            Schema::object()
                .property("query", Schema::string().describe("Search keyword"))
                .property("category", Schema::string().describe("Category filter")),
        )
        .read_only(),
        Tool::new(
            GET_CATEGORIES,
            "List all product categories.",
            GetCategories {
                catalog: catalog.clone(),
            },
        )
        .with_input_schema(Schema::object())
        .read_only(),
        Tool::new(
            GET_PRODUCT_DETAILS,
            "Get a product's full details by ID.",
            GetProductDetails {
                catalog: catalog.clone(),
            },
        )
        .with_input_schema(id_schema("Product ID"))
        .read_only(),
        Tool::new(
            ADD_TO_CART,
            "Add a product to cart by ID. Fetches the product first, then adds it.",
            AddToCart {
                catalog,
                carts: carts.clone(),
            },
        )
        .with_input_schema(id_schema("Product ID")),
        Tool::new(
            REMOVE_FROM_CART,
            "Remove a product from cart by product ID.",
            RemoveFromCart {
                carts: carts.clone(),
            },
        )
        .with_input_schema(id_schema("Product ID to remove")),
        Tool::new(
            GET_CART,
            "Get current cart contents, total, and item count.",
            GetCart {
                carts: carts.clone(),
            },
        )
        .with_input_schema(Schema::object())
        .read_only(),
        Tool::new(CLEAR_CART, "Clear the entire cart.", ClearCart { carts })
            .with_input_schema(Schema::object()),
    ]
}

/// Names registered by [`register_storefront_tools`]
#[derive(Debug, Clone)]
pub struct ToolRegistration {
    names: Vec<String>,
}

impl ToolRegistration {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Unregisters every tool, ignoring ones already removed.
    pub fn unregister(self, context: &ModelContext) {
        for name in self.names {
            if let Err(e) = context.unregister_tool(&name) {
                tracing::debug!(tool = %name, error = %e, "Tool already unregistered");
            }
        }
    }
}

/// Registers the storefront tools as dynamic tools.
///
/// If any name is taken, the tools registered so far are removed again.
pub fn register_storefront_tools(
    context: &ModelContext,
    catalog: Arc<dyn CatalogStore>,
    carts: Arc<CartSessions>,
) -> Result<ToolRegistration, RegistryError> {
    let mut registration = ToolRegistration { names: Vec::new() };
    for tool in storefront_tools(catalog, carts) {
        let name = tool.name.clone();
        if let Err(e) = context.register_tool(tool) {
            registration.unregister(context);
            return Err(e);
        }
        registration.names.push(name);
    }

    tracing::info!(count = registration.names.len(), "Registered storefront tools");
    Ok(registration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, InMemoryCatalog, Product};
    use crate::webmcp::registry::ModelContextOptions;

    struct BrokenCatalog;

    #[async_trait]
    impl CatalogStore for BrokenCatalog {
        async fn search(&self, _: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
            Err(CatalogError::Unavailable("offline".into()))
        }
        async fn categories(&self) -> Result<Vec<String>, CatalogError> {
            Err(CatalogError::Unavailable("offline".into()))
        }
        async fn find(&self, _: &str) -> Result<Option<Product>, CatalogError> {
            Err(CatalogError::Unavailable("offline".into()))
        }
    }

    struct Fixture {
        context: ModelContext,
        carts: Arc<CartSessions>,
        products: Vec<Product>,
        client: ModelContextClient,
    }

    async fn fixture() -> Fixture {
        let catalog = InMemoryCatalog::seeded();
        let products = catalog.search(&ProductQuery::default()).await.unwrap();
        let carts = Arc::new(CartSessions::in_memory());
        let context = ModelContext::new();
        register_storefront_tools(&context, Arc::new(catalog), carts.clone()).unwrap();
        Fixture {
            context,
            carts,
            products,
            client: ModelContextClient::new("agent-session"),
        }
    }

    impl Fixture {
        async fn call(&self, name: &str, input: Value) -> Result<ToolResponse, ToolError> {
            self.context.execute(name, input, &self.client).await
        }
    }

    #[tokio::test]
    async fn test_all_tools_registered() {
        let f = fixture().await;
        let tools = f.context.tools();
        assert_eq!(tools.len(), 7);

        let read_only: Vec<_> = tools
            .iter()
            .filter(|t| {
                t.descriptor
                    .annotations
                    .as_ref()
                    .and_then(|a| a.read_only_hint)
                    .unwrap_or(false)
            })
            .map(|t| t.descriptor.name.as_str())
            .collect();
        assert_eq!(
            read_only,
            vec![GET_CART, GET_CATEGORIES, GET_PRODUCT_DETAILS, SEARCH_PRODUCTS]
        );
    }

    #[tokio::test]
    async fn test_search_and_categories() {
        let f = fixture().await;

        let found = f
            .call(SEARCH_PRODUCTS, json!({ "query": "bluetooth" }))
            .await
            .unwrap()
            .json()
            .unwrap();
        let names: Vec<_> = found
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Portable Bluetooth Speaker", "Wireless Noise-Cancelling Headphones"]
        );

        let sports = f
            .call(SEARCH_PRODUCTS, json!({ "category": "Sports" }))
            .await
            .unwrap()
            .json()
            .unwrap();
        assert_eq!(sports.as_array().unwrap().len(), 4);

        let categories = f.call(GET_CATEGORIES, json!({})).await.unwrap().json().unwrap();
        assert_eq!(categories.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_cart_tools_share_the_session_cart() {
        let f = fixture().await;
        let product = &f.products[0];

        let added = f
            .call(ADD_TO_CART, json!({ "id": product.id }))
            .await
            .unwrap();
        assert_eq!(
            added.json().unwrap(),
            json!({ "success": true, "product": product.name })
        );
        f.call(ADD_TO_CART, json!({ "id": product.id })).await.unwrap();

        let cart = f.call(GET_CART, json!({})).await.unwrap().json().unwrap();
        assert_eq!(cart["itemCount"], 2);
        assert_eq!(cart["items"][0]["quantity"], 2);
        assert_eq!(f.carts.view("agent-session").total, product.price * 2.0);

        f.call(REMOVE_FROM_CART, json!({ "id": product.id })).await.unwrap();
        assert!(f.carts.view("agent-session").items.is_empty());

        f.call(ADD_TO_CART, json!({ "id": product.id })).await.unwrap();
        f.call(CLEAR_CART, json!({})).await.unwrap();
        assert_eq!(f.carts.view("agent-session").item_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_product_is_an_error_response() {
        let f = fixture().await;
        for name in [GET_PRODUCT_DETAILS, ADD_TO_CART] {
            let response = f.call(name, json!({ "id": "missing" })).await.unwrap();
            assert!(response.is_error);
            assert_eq!(response.json().unwrap(), json!({ "error": "Product not found" }));
        }
        assert!(f.carts.view("agent-session").items.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_the_cart() {
        let f = fixture().await;
        let err = f.call(ADD_TO_CART, json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));

        let err = f.call(ADD_TO_CART, json!({ "id": 5 })).await.unwrap_err();
        assert!(err.to_string().contains("expected type \"string\""));

        assert!(f.carts.is_empty());
        assert_eq!(f.context.call_history().len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_failures_become_error_responses() {
        let context = ModelContext::new();
        let carts = Arc::new(CartSessions::in_memory());
        register_storefront_tools(&context, Arc::new(BrokenCatalog), carts).unwrap();
        let client = ModelContextClient::new("s");

        let search = context
            .execute(SEARCH_PRODUCTS, json!({}), &client)
            .await
            .unwrap();
        assert_eq!(
            search.json().unwrap(),
            json!({ "error": "Failed to search products" })
        );

        let categories = context
            .execute(GET_CATEGORIES, json!({}), &client)
            .await
            .unwrap();
        assert!(categories.is_error);
    }

    #[tokio::test]
    async fn test_registration_rolls_back_and_unregisters() {
        let context = ModelContext::new();
        let carts = Arc::new(CartSessions::in_memory());
        let blocker = storefront_tools(Arc::new(InMemoryCatalog::default()), carts.clone())
            .into_iter()
            .find(|t| t.name == GET_CART)
            .unwrap();
        context
            .provide_context(ModelContextOptions::with_tools(vec![blocker]))
            .unwrap();

        let empty = Arc::new(InMemoryCatalog::default());
        let err = register_storefront_tools(&context, empty.clone(), carts.clone()).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered(GET_CART.into()));
        assert_eq!(context.tools().len(), 1);

        context.clear_context();
        let registration = register_storefront_tools(&context, empty, carts).unwrap();
        assert_eq!(registration.names().len(), 7);
        context.unregister_tool(CLEAR_CART).unwrap();
        registration.unregister(&context);
        assert!(context.tools().is_empty());
    }
}
