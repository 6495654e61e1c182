mod branches;
mod employees;
mod page;
mod positions;

use std::sync::Arc;

use axum::Router;

use crate::service::DirectoryService;

/// Shared application state.
pub type AppState = Arc<DirectoryService>;

/// Build the directory router: the JSON API under `/api` plus the
/// server-rendered page at `/`.
pub fn build_router(svc: Arc<DirectoryService>) -> Router {
    let api = Router::new()
        .merge(branches::routes())
        .merge(positions::routes())
        .merge(employees::routes());

    Router::new()
        .nest("/api", api)
        .merge(page::routes())
        .with_state(svc)
}
