pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Json, Router,
};
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::services::PushProvider;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Push Notification API",
        description = "API to send push notifications using Firebase"
    ),
    paths(
        handlers::notification::send_notification,
        handlers::root::hello,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(models::NotificationRequest, handlers::root::HelloResponse)),
    tags(
        (name = "Notifications", description = "Topic push notifications"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

/// State shared by every handler. The provider is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub push_provider: Arc<dyn PushProvider>,
    pub swagger_enabled: bool,
}

impl AppState {
    pub fn new(push_provider: Arc<dyn PushProvider>) -> Self {
        Self {
            push_provider,
            swagger_enabled: true,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::hello))
        .route("/send-notification", post(handlers::send_notification))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics));

    if state.swagger_enabled {
        app = app.merge(SwaggerUi::new("/api-docs").url("/openapi.json", ApiDoc::openapi()));
    } else {
        // Keep the document available for programmatic clients.
        app = app.route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));
    }

    app.with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
