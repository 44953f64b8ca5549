use anyhow::{Context, Result};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};

/// Bind the listener and serve the API until shutdown. CORS is left
/// open for the browser frontend.
pub async fn run(port: u16, state: AppState) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app).await.context("Server exited")?;
    Ok(())
}
