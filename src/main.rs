use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use storefront_rust::cart::CartSessions;
use storefront_rust::catalog::{seed, CatalogStore, InMemoryCatalog};
use storefront_rust::config::{init_tracing, Cli, Command, ServeArgs};
use storefront_rust::router::create_app_router;
use storefront_rust::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.into_command() {
        Command::Serve(args) => serve(args).await,
        Command::Seed(args) => {
            seed::write_seed(&args.out)
                .with_context(|| format!("Failed to seed {}", args.out.display()))?;
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    // Initialize application state
    let catalog: Arc<dyn CatalogStore> = match &args.catalog {
        Some(path) => Arc::new(
            InMemoryCatalog::from_path(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        ),
        None => Arc::new(InMemoryCatalog::seeded()),
    };
    let carts = Arc::new(match args.sessions_dir() {
        Some(dir) => {
            tracing::info!("Persisting carts under {}", dir.display());
            CartSessions::on_disk(dir)
        }
        None => CartSessions::in_memory(),
    });
    let state = Arc::new(AppState::new(catalog, carts)?);

    // Build application router with all routes and middleware
    let app = create_app_router(state.clone());

    // Configure the server address
    let addr = args.socket_addr().context("Invalid listen address")?;
    tracing::info!("Server running on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::Arc;
    use storefront_rust::cart::CartSessions;
    use storefront_rust::catalog::{CatalogStore, InMemoryCatalog, ProductQuery};
    use storefront_rust::mcp::handlers::handle_tool_call;
    use storefront_rust::state::AppState;
    use storefront_rust::webmcp::{tools::ADD_TO_CART, ModelContextClient};

    #[tokio::test]
    async fn test_state_manager_and_aggregation() {
        let catalog = InMemoryCatalog::seeded();
        let products = catalog.search(&ProductQuery::default()).await.unwrap();
        let state = AppState::new(Arc::new(catalog), Arc::new(CartSessions::in_memory())).unwrap();
        let session = "test_cart_1";

        // 1. Initial Insert (Simulate the UI adding once)
        state
            .carts
            .with_cart(session, |cart| cart.add_to_cart(products[0].clone()));

        // 2. Tool Call (Simulate the agent adding the same product)
        let client = ModelContextClient::new(session);
        handle_tool_call(
            &state.model_context,
            ADD_TO_CART,
            Some(json!({ "id": products[0].id })),
            &client,
        )
        .await
        .expect("Tool call failed");

        // 3. Verify
        let view = state.carts.view(session);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 2, "Quantity should aggregate to 1+1=2");

        state.shutdown();
        assert!(state.model_context.tools().is_empty());
        state.shutdown();
    }
}
