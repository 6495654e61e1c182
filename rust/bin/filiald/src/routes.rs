//! Route registration: module routes plus system endpoints.

use axum::Router;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::info;

use filial_core::Module;

/// Build the complete router. Module routes carry absolute paths.
pub fn build_router(modules: &[Box<dyn Module>]) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/styles.css", get(stylesheet));

    for module in modules {
        info!("Mounting {} routes", module.name());
        app = app.merge(module.routes());
    }
    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "filiald",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("web/styles.css"),
    )
}
