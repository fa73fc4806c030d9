use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

pub fn app() -> Router {
    Router::new()
        .route("/json", get(canned_json))
        .route("/not-json", get(not_json))
        .route("/echo", post(echo))
        .route("/headers", get(reflect_headers))
        .route("/status/{code}", get(fixed_status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn canned_json() -> Json<serde_json::Value> {
    Json(json!({"a": 1}))
}

/// A 200 whose body is deliberately not JSON, despite what the client asked
/// for in `Accept`.
async fn not_json() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "text/plain")], "not json")
}

async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// Reflect the request headers back as a JSON object, names lowercased.
async fn reflect_headers(headers: HeaderMap) -> Json<serde_json::Value> {
    let mut reflected = serde_json::Map::new();
    for (name, value) in &headers {
        if let Ok(value) = value.to_str() {
            reflected.insert(name.as_str().to_string(), json!(value));
        }
    }
    Json(serde_json::Value::Object(reflected))
}

async fn fixed_status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {}", status.as_u16())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn canned_json_body_parses() {
        let Json(value) = canned_json().await;
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn fixed_status_rejects_out_of_range_codes() {
        let resp = fixed_status(Path(99)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
