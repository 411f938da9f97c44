use super::{ProviderError, ProviderResponse, PushProvider};
use crate::models::TopicMessage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// In-memory push provider used when FCM is disabled and in tests.
///
/// Every call to `send` is recorded, including ones configured to fail.
pub struct MockPushProvider {
    fail: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<TopicMessage>>,
}

impl MockPushProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every delivery is rejected.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent_messages(&self) -> Vec<TopicMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Default for MockPushProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushProvider for MockPushProvider {
    async fn send(&self, message: &TopicMessage) -> Result<ProviderResponse, ProviderError> {
        let count = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }

        if self.fail {
            return Err(ProviderError::SendFailed(format!(
                "[MOCK] topic '{}' rejected: Requested entity was not found",
                message.topic
            )));
        }

        tracing::warn!(
            topic = %message.topic,
            title = %message.notification.title,
            "[MOCK] Push notification not delivered"
        );

        Ok(ProviderResponse::new(format!(
            "projects/mock/messages/{}",
            count
        )))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
