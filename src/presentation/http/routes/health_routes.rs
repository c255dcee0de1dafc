use axum::{Json, Router, routing::get};

use crate::presentation::http::dto::HealthResponseDto;

pub fn health_routes() -> Router {
    Router::new().route("/", get(root_handler))
}

async fn root_handler() -> Json<HealthResponseDto> {
    Json(HealthResponseDto {
        status: "ok".to_string(),
    })
}
