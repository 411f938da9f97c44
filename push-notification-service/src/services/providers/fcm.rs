use super::{ProviderError, ProviderResponse, PushProvider};
use crate::config::FcmConfig;
use crate::models::TopicMessage;
use crate::services::credentials::ServiceAccountKey;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Firebase Cloud Messaging HTTP v1 provider.
///
/// Authenticates with the OAuth2 JWT-bearer flow using the service account's
/// RSA key and caches the resulting access token until shortly before it
/// expires.
pub struct FcmProvider {
    project_id: String,
    client_email: String,
    token_uri: String,
    api_base_url: String,
    encoding_key: EncodingKey,
    client: Client,
    token: RwLock<Option<CachedToken>>,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS as u64
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    message: &'a TopicMessage,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    name: String,
}

impl FcmProvider {
    pub fn new(key: ServiceAccountKey, config: &FcmConfig) -> Result<Self, ProviderError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            ProviderError::Configuration(format!(
                "Failed to parse service account private key: {}",
                e
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            project_id: key.project_id,
            client_email: key.client_email,
            token_uri: key.token_uri,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            encoding_key,
            client,
            token: RwLock::new(None),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn sign_assertion(&self) -> Result<String, ProviderError> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: FCM_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key).map_err(|e| {
            ProviderError::Authentication(format!("Failed to sign token assertion: {}", e))
        })
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = self.token.read().await.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let mut guard = self.token.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let fresh = self.fetch_access_token().await?;
        let access_token = fresh.access_token.clone();
        *guard = Some(fresh);
        Ok(access_token)
    }

    async fn fetch_access_token(&self) -> Result<CachedToken, ProviderError> {
        let assertion = self.sign_assertion()?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| transport_error("Failed to reach OAuth2 token endpoint", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Authentication(format!(
                "Token endpoint returned error status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ProviderError::Authentication(format!("Failed to parse token response: {}", e))
        })?;

        tracing::debug!(
            client_email = %self.client_email,
            expires_in = token.expires_in,
            "Obtained FCM access token"
        );

        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(token.expires_in))
            .ok_or_else(|| {
                ProviderError::Authentication(format!(
                    "Token endpoint returned out-of-range expires_in: {}",
                    token.expires_in
                ))
            })?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

fn transport_error(context: &str, e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(format!("{}: {}", context, e))
    } else {
        ProviderError::Connection(format!("{}: {}", context, e))
    }
}

#[async_trait]
impl PushProvider for FcmProvider {
    async fn send(&self, message: &TopicMessage) -> Result<ProviderResponse, ProviderError> {
        let access_token = self.access_token().await?;

        let url = format!(
            "{}/projects/{}/messages:send",
            self.api_base_url, self.project_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&access_token)
            .json(&FcmRequest { message })
            .send()
            .await
            .map_err(|e| transport_error("Failed to connect to FCM", e))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.token.write().await.take();
            }
            let body = response.text().await.unwrap_or_default();
            let detail = format!("FCM API returned error status {}: {}", status, body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::Authentication(detail)
                }
                _ => ProviderError::SendFailed(detail),
            });
        }

        let fcm_response: FcmResponse = response.json().await.map_err(|e| {
            ProviderError::SendFailed(format!("Failed to parse FCM response: {}", e))
        })?;

        tracing::debug!(
            topic = %message.topic,
            message_id = %fcm_response.name,
            "Topic message accepted by FCM"
        );

        Ok(ProviderResponse::new(fcm_response.name))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.project_id.is_empty() {
            return Err(ProviderError::Configuration(
                "FCM project_id is not configured".to_string(),
            ));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fcm"
    }
}
