use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_agent_handler, create_group_handler, get_agents_handler, get_drivers_handler,
    get_groups_handler, get_history_handler, send_message_handler,
};
use crate::state::AppState;
use crate::subscriptions::subscribe_handler;

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/agents", get(get_agents_handler).post(create_agent_handler))
        .route("/api/drivers", get(get_drivers_handler))
        .route("/api/groups", get(get_groups_handler).post(create_group_handler))
        .route("/api/history", get(get_history_handler))
        .route("/api/messages", post(send_message_handler))
        .route("/api/subscriptions/:topic", get(subscribe_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    state: AppState,
    port: u16,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            tracing::info!("Server shutting down signal received");
        })
        .await?;

    Ok(())
}
