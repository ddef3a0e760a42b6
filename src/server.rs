//! MCP server startup for the stdio and streamable HTTP transports.

use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::Arc;

use crate::tools::CortexTools;
use cortex::config::CortexConfig;
use cortex::store::StoreRegistry;

fn registry(config: CortexConfig) -> Arc<StoreRegistry> {
    tracing::info!(
        data_dir = %config.resolved_data_dir().display(),
        default_store = %config.storage.default_store,
        "store registry ready"
    );
    Arc::new(StoreRegistry::new(Arc::new(config)))
}

/// Start the MCP server over stdio.
pub async fn serve_stdio(config: CortexConfig) -> Result<()> {
    tracing::info!("starting Cortex MCP server on stdio");

    let tools = CortexTools::new(registry(config));
    let server = tools.serve(rmcp::transport::stdio()).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");
    Ok(())
}

/// Start the MCP server over streamable HTTP at `/mcp`.
pub async fn serve_http(config: CortexConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %bind_addr, "starting Cortex MCP server on HTTP");

    let stores = registry(config);
    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(CortexTools::new(Arc::clone(&stores))),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
