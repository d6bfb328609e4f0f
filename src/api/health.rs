//! Health check and welcome endpoints

use axum::{response::Html, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Welcome page at the server root
pub async fn welcome() -> Html<&'static str> {
    Html(
        "<h1>Welcome to Book Management API!</h1>\
         <p>Use /api/authors and /api/books to access data.</p>",
    )
}
