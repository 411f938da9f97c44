use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HelloResponse {
    #[schema(example = "hello hridhyam")]
    pub message: String,
}

/// Greeting
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service greeting", body = HelloResponse)
    ),
    tag = "Observability"
)]
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "hello hridhyam".to_string(),
    })
}
