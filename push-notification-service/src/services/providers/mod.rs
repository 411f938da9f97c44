pub mod fcm;
pub mod mock;

use crate::models::TopicMessage;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use fcm::FcmProvider;
pub use mock::MockPushProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Send error: {0}")]
    SendFailed(String),
}

impl ProviderError {
    /// Stable label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Configuration(_) => "configuration",
            ProviderError::Connection(_) => "connection",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Authentication(_) => "authentication",
            ProviderError::SendFailed(_) => "send_failed",
        }
    }
}

/// Successful delivery acknowledgement. `message_id` is opaque.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderResponse {
    pub message_id: String,
}

impl ProviderResponse {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }
}

/// External push delivery service.
#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, message: &TopicMessage) -> Result<ProviderResponse, ProviderError>;
    async fn health_check(&self) -> Result<(), ProviderError>;
    fn name(&self) -> &'static str;
}
