use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use beerstock_infra::StockError;

pub fn stock_error_to_response(err: StockError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        StockError::AlreadyExists(_) => json_error(StatusCode::BAD_REQUEST, "already_exists", message),
        StockError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        StockError::StockExceeded(_) => json_error(StatusCode::BAD_REQUEST, "stock_exceeded", message),
        StockError::StockBelowZero(_) => {
            json_error(StatusCode::BAD_REQUEST, "stock_below_zero", message)
        }
        StockError::Invalid(e) => {
            tracing::error!(error = %e, "stored beer record is invalid");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "corrupt_record", message)
        }
        StockError::Store(e) => {
            tracing::error!(error = %e, "beer store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message)
        }
    }
}

pub fn validation_error(problems: Vec<String>) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", problems.join("; "))
}

pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn invalid_id(raw: &str) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_id",
        format!("{raw} is not a valid beer id"),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
