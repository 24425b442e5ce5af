use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::commands::{garments, outfits};
use crate::config::Config;
use crate::error::AppError;
use crate::AppState;

/// All API routes, without CORS (which depends on deployment config).
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/garments",
            get(garments::list_garments).post(garments::create_garment),
        )
        .route(
            "/api/garments/",
            get(garments::list_garments).post(garments::create_garment),
        )
        .route(
            "/api/garments/{garment_id}",
            put(garments::update_garment).delete(garments::delete_garment),
        )
        .route("/api/outfits/analyze", post(outfits::analyze))
        .route("/api/outfits/find-ideas", post(outfits::find_ideas))
        .route("/api/outfits/generate", post(outfits::generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive when no origins are configured; otherwise an explicit allow-list.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, AppError> {
    if origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let values = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|_| AppError::Config(format!("invalid CORS origin: {o}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(values))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Bind and serve until `shutdown_rx` changes.
pub async fn start_server(
    config: &Config,
    state: Arc<AppState>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), AppError> {
    let addr = config.socket_addr()?;
    let app = router(state).layer(cors_layer(&config.cors_origins)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Closet API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            tracing::info!("Closet API shutting down");
        })
        .await?;

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM, then notify the server.
pub async fn wait_for_shutdown(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    let _ = shutdown_tx.send(true);
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "closet-ai" }))
}
