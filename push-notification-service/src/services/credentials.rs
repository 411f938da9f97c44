//! Service-account credentials for the FCM HTTP v1 API.

use crate::config::{FcmConfig, DEFAULT_TOKEN_URI};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Failed to read service account key from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service account key: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Service account credential field '{0}' is missing")]
    Missing(&'static str),
}

/// The subset of a Google service-account key the FCM provider needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[redacted]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, CredentialsError> {
        let key: Self = serde_json::from_str(json)?;
        key.validated()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CredentialsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Resolves credentials from the key file when one is configured,
    /// otherwise from the individual `FCM_*` fields.
    pub fn from_config(config: &FcmConfig) -> Result<Self, CredentialsError> {
        if let Some(path) = &config.service_account_path {
            tracing::info!(path = %path, "Loading FCM service account key from file");
            return Self::from_file(path);
        }

        let key = Self {
            project_id: config
                .project_id
                .clone()
                .ok_or(CredentialsError::Missing("project_id"))?,
            client_email: config
                .client_email
                .clone()
                .ok_or(CredentialsError::Missing("client_email"))?,
            // Keys passed through env files usually carry escaped newlines.
            private_key: config
                .private_key
                .as_deref()
                .ok_or(CredentialsError::Missing("private_key"))?
                .replace("\\n", "\n"),
            token_uri: config.token_uri.clone(),
        };
        key.validated()
    }

    fn validated(self) -> Result<Self, CredentialsError> {
        if self.project_id.trim().is_empty() {
            return Err(CredentialsError::Missing("project_id"));
        }
        if self.client_email.trim().is_empty() {
            return Err(CredentialsError::Missing("client_email"));
        }
        if self.private_key.trim().is_empty() {
            return Err(CredentialsError::Missing("private_key"));
        }
        if self.token_uri.trim().is_empty() {
            return Err(CredentialsError::Missing("token_uri"));
        }
        Ok(self)
    }
}
