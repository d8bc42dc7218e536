use anyhow::Context;
use clap::Parser;
use todo_api::application::todo_service::ToDoServiceImpl;
use todo_api::config::Config;
use todo_api::domain::repository::ToDoStore;
use todo_api::http::routing::{self, rpc, todos};
use todo_api::infrastructure::sqlite_repo::SqliteToDoStore;
use todo_api::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::parse();
    logging::init(&config.log_level, config.log_time_format.as_deref())?;
    config.validate()?;

    let store = SqliteToDoStore::connect(&config.database_url).await?;
    store.init().await?;
    tracing::info!(database_url = %config.database_url, "schema ready");

    let service = ToDoServiceImpl::new(store);
    let rpc_router = routing::app(rpc::router(todos::AppState { service: service.clone() }));
    let http_router = routing::app(todos::router(todos::AppState { service }));

    let rpc_addr = config.rpc_addr();
    let http_addr = config.http_addr();
    let rpc_listener = tokio::net::TcpListener::bind(rpc_addr).await.with_context(|| format!("failed to bind RPC port {rpc_addr}"))?;
    let http_listener = tokio::net::TcpListener::bind(http_addr).await.with_context(|| format!("failed to bind HTTP port {http_addr}"))?;
    tracing::info!(%rpc_addr, "RPC surface listening");
    tracing::info!(%http_addr, "REST gateway listening");

    let rpc_server = axum::serve(rpc_listener, rpc_router).with_graceful_shutdown(shutdown_signal());
    let http_server = axum::serve(http_listener, http_router).with_graceful_shutdown(shutdown_signal());
    tokio::try_join!(
        async { rpc_server.await.context("RPC server failed") },
        async { http_server.await.context("HTTP gateway failed") },
    )?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
