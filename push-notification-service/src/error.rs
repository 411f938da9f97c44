use crate::services::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const MISSING_PARAMETERS_MESSAGE: &str = "Missing required parameters: topic, title, body";
pub const DELIVERY_FAILED_MESSAGE: &str = "Error sending message";

/// Terminal outcomes of `POST /send-notification` other than success.
///
/// The `Display` text is exactly what the client receives, so provider
/// detail never reaches the response body.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("{}", MISSING_PARAMETERS_MESSAGE)]
    Validation(#[from] validator::ValidationErrors),

    #[error("{}", DELIVERY_FAILED_MESSAGE)]
    Delivery(#[from] ProviderError),
}

impl NotificationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::Validation(_) => StatusCode::BAD_REQUEST,
            NotificationError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
