#![allow(dead_code)]

use push_notification_service::config::{
    Environment, FcmConfig, PushConfig, SwaggerConfig, DEFAULT_FCM_API_BASE_URL, DEFAULT_TOKEN_URI,
};
use push_notification_service::services::{MockPushProvider, PushProvider};
use push_notification_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const KEY_FILE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/service-account.json"
);

pub fn test_config() -> PushConfig {
    PushConfig {
        // Use random port for testing (port 0)
        common: CoreConfig { port: 0 },
        environment: Environment::Dev,
        service_name: "push-notification-service-test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        fcm: FcmConfig {
            enabled: false, // Use mock
            service_account_path: None,
            project_id: None,
            client_email: None,
            private_key: None,
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            api_base_url: DEFAULT_FCM_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
        },
        swagger: SwaggerConfig { enabled: true },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockPushProvider>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(MockPushProvider::new())).await
    }

    pub async fn spawn_with(provider: Arc<MockPushProvider>) -> Self {
        let app = Application::build_with_provider(
            test_config(),
            provider.clone() as Arc<dyn PushProvider>,
        )
        .await
        .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            provider,
        }
    }
}
