use axum::{routing::get, Router};

pub mod beers;
pub mod system;

/// Router for all endpoints; expects `Extension<Arc<AppServices>>` to be layered on.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/api/v1/beers", beers::router())
}
