use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_FCM_API_BASE_URL: &str = "https://fcm.googleapis.com/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub fcm: FcmConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
    /// Defaults to true. When explicitly false the service runs against the
    /// in-memory mock provider, which delivers nothing.
    pub enabled: bool,
    /// Path to a service-account JSON key. Takes precedence over the
    /// individual credential fields below.
    pub service_account_path: Option<String>,
    pub project_id: Option<String>,
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub token_uri: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwaggerConfig {
    pub enabled: bool,
}

impl PushConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ENVIRONMENT").as_deref() {
            Some("prod") => Environment::Prod,
            _ => Environment::Dev,
        };

        let fcm = FcmConfig {
            enabled: parse_var(&lookup, "FCM_ENABLED", true)?,
            service_account_path: non_empty(&lookup, "FCM_SERVICE_ACCOUNT_PATH")
                .or_else(|| non_empty(&lookup, "GOOGLE_APPLICATION_CREDENTIALS")),
            project_id: non_empty(&lookup, "FCM_PROJECT_ID"),
            client_email: non_empty(&lookup, "FCM_CLIENT_EMAIL"),
            private_key: non_empty(&lookup, "FCM_PRIVATE_KEY"),
            token_uri: non_empty(&lookup, "FCM_TOKEN_URI")
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            api_base_url: non_empty(&lookup, "FCM_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FCM_API_BASE_URL.to_string()),
            request_timeout_secs: parse_var(&lookup, "FCM_REQUEST_TIMEOUT_SECS", 10)?,
            connect_timeout_secs: parse_var(&lookup, "FCM_CONNECT_TIMEOUT_SECS", 5)?,
        };

        if environment == Environment::Prod && !fcm.enabled {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "FCM_ENABLED must be true in production"
            )));
        }

        if fcm.request_timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "FCM_REQUEST_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(PushConfig {
            common,
            environment,
            service_name: non_empty(&lookup, "SERVICE_NAME")
                .unwrap_or_else(|| "push-notification-service".to_string()),
            log_level: non_empty(&lookup, "LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: non_empty(&lookup, "OTLP_ENDPOINT"),
            fcm,
            swagger: SwaggerConfig {
                enabled: parse_var(&lookup, "SWAGGER_ENABLED", true)?,
            },
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}
