//! Application startup and lifecycle management.

use crate::config::PushConfig;
use crate::services::{FcmProvider, MockPushProvider, PushProvider, ServiceAccountKey};
use crate::{build_router, AppState};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, constructing the push provider from config.
    pub async fn build(config: PushConfig) -> Result<Self, AppError> {
        let push_provider = build_push_provider(&config)?;
        Self::build_with_provider(config, push_provider).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: PushConfig,
        push_provider: Arc<dyn PushProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            push_provider,
            swagger_enabled: config.swagger.enabled,
        };

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!("Server listening on port {}", self.port);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

fn build_push_provider(config: &PushConfig) -> Result<Arc<dyn PushProvider>, AppError> {
    if !config.fcm.enabled {
        tracing::warn!(
            "FCM_ENABLED=false: using mock push provider, notifications will not be delivered"
        );
        return Ok(Arc::new(MockPushProvider::new()));
    }

    let key = ServiceAccountKey::from_config(&config.fcm).map_err(|e| {
        tracing::error!("Failed to load FCM credentials: {}", e);
        AppError::ConfigError(anyhow::Error::new(e))
    })?;

    let provider = FcmProvider::new(key, &config.fcm).map_err(|e| {
        tracing::error!("Failed to initialize FCM provider: {}", e);
        AppError::ConfigError(anyhow::Error::new(e))
    })?;

    tracing::info!(
        project_id = %provider.project_id(),
        "FCM push provider initialized"
    );
    Ok(Arc::new(provider))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
