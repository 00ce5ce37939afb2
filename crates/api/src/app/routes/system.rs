use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use beerstock_infra::config::StorageBackend;

use crate::app::services::AppServices;

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let storage = match services.backend() {
        StorageBackend::Memory => "memory",
        StorageBackend::Postgres => "postgres",
    };
    Json(serde_json::json!({
        "status": "ok",
        "storage": storage,
    }))
}
