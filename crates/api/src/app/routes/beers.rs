use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use beerstock_core::BeerId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

// One segment name for every `/:beer` route: the router rejects siblings whose
// parameter names differ. It holds a name for GET and an id everywhere else.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_beers).post(create_beer))
        .route("/:beer", get(find_by_name).delete(delete_beer))
        .route("/:beer/increment", patch(increment))
        .route("/:beer/decrement", patch(decrement))
}

pub async fn create_beer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateBeerRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let candidate = match body.validate() {
        Ok(c) => c,
        Err(problems) => return errors::validation_error(problems),
    };

    match services.stock().create(candidate).await {
        Ok(beer) => (StatusCode::CREATED, Json(dto::beer_to_response(&beer))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn list_beers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.stock().list_all().await {
        Ok(beers) => (StatusCode::OK, Json(dto::beers_to_response(&beers))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn find_by_name(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.stock().find_by_name(&name).await {
        Ok(beer) => (StatusCode::OK, Json(dto::beer_to_response(&beer))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn delete_beer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BeerId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id(&id),
    };

    match services.stock().delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn increment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let (id, amount) = match parse_adjustment(&id, body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.stock().increment(id, amount).await {
        Ok(beer) => (StatusCode::OK, Json(dto::beer_to_response(&beer))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn decrement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let (id, amount) = match parse_adjustment(&id, body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.stock().decrement(id, amount).await {
        Ok(beer) => (StatusCode::OK, Json(dto::beer_to_response(&beer))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

fn parse_adjustment(
    raw_id: &str,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> Result<(BeerId, u32), axum::response::Response> {
    let id: BeerId = raw_id.parse().map_err(|_| errors::invalid_id(raw_id))?;
    let Json(body) = body.map_err(errors::json_rejection)?;
    let amount = body.validate().map_err(errors::validation_error)?;
    Ok((id, amount))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::app::build_app;

    fn app() -> Router {
        build_app(Arc::new(AppServices::in_memory()))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn brahma() -> Value {
        json!({ "name": "Brahma", "brand": "Ambev", "max": 50, "quantity": 10, "type": "LAGER" })
    }

    #[tokio::test]
    async fn create_returns_201_with_assigned_id() {
        let app = app();
        let (status, body) = call(&app, Method::POST, "/api/v1/beers", Some(brahma())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Brahma");
        assert_eq!(body["brand"], "Ambev");
        assert_eq!(body["type"], "LAGER");
        assert_eq!(body["quantity"], 10);
        assert_eq!(body["max"], 50);
    }

    #[tokio::test]
    async fn duplicate_create_returns_400() {
        let app = app();
        call(&app, Method::POST, "/api/v1/beers", Some(brahma())).await;
        let (status, body) = call(&app, Method::POST, "/api/v1/beers", Some(brahma())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "already_exists");
        assert_eq!(
            body["message"],
            "Beer with name Brahma already registered in the system."
        );
    }

    #[tokio::test]
    async fn create_without_required_field_returns_400() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/beers",
            Some(json!({ "name": "Brahma", "max": 50, "quantity": 10, "type": "LAGER" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "brand is required");
    }

    #[tokio::test]
    async fn create_with_unknown_type_returns_400() {
        let app = app();
        let mut beer = brahma();
        beer["type"] = json!("PILSNER");
        let (status, body) = call(&app, Method::POST, "/api/v1/beers", Some(beer)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_body");
    }

    #[tokio::test]
    async fn list_is_empty_then_populated() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/api/v1/beers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        call(&app, Method::POST, "/api/v1/beers", Some(brahma())).await;
        let (_, body) = call(&app, Method::GET, "/api/v1/beers", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Brahma");
    }

    #[tokio::test]
    async fn find_by_name_returns_200_or_404() {
        let app = app();
        call(&app, Method::POST, "/api/v1/beers", Some(brahma())).await;

        let (status, body) = call(&app, Method::GET, "/api/v1/beers/Brahma", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Brahma");

        let (status, body) = call(&app, Method::GET, "/api/v1/beers/Skol", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn delete_returns_204_then_404() {
        let app = app();
        call(&app, Method::POST, "/api/v1/beers", Some(brahma())).await;

        let (status, body) = call(&app, Method::DELETE, "/api/v1/beers/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = call(&app, Method::DELETE, "/api/v1/beers/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_returns_400() {
        let app = app();
        let (status, body) = call(&app, Method::DELETE, "/api/v1/beers/Brahma", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_id");

        let (status, _) = call(
            &app,
            Method::PATCH,
            "/api/v1/beers/abc/increment",
            Some(json!({ "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn increment_and_decrement_map_business_failures() {
        let app = app();
        call(&app, Method::POST, "/api/v1/beers", Some(brahma())).await;

        let (status, body) = call(
            &app,
            Method::PATCH,
            "/api/v1/beers/1/increment",
            Some(json!({ "quantity": 10 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quantity"], 20);

        let (status, body) = call(
            &app,
            Method::PATCH,
            "/api/v1/beers/1/increment",
            Some(json!({ "quantity": 35 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "stock_exceeded");

        let (status, body) = call(
            &app,
            Method::PATCH,
            "/api/v1/beers/1/decrement",
            Some(json!({ "quantity": 21 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "stock_below_zero");

        let (status, body) = call(
            &app,
            Method::PATCH,
            "/api/v1/beers/2/decrement",
            Some(json!({ "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn adjust_quantity_out_of_range_returns_400() {
        let app = app();
        call(&app, Method::POST, "/api/v1/beers", Some(brahma())).await;

        let (status, body) = call(
            &app,
            Method::PATCH,
            "/api/v1/beers/1/increment",
            Some(json!({ "quantity": 101 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn health_reports_storage_backend() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage"], "memory");
    }
}
