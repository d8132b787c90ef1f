//! Secret lookup for upstream API credentials.
//!
//! Two backends share the [`SecretProvider`] interface:
//! - [`EnvSecretProvider`]: process environment (local runs, `.env` via dotenvy)
//! - [`DirectorySecretProvider`]: managed secret store mounted as files,
//!   one file per secret name

use crate::config::{SecretSource, SecretsConfig};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub const API_TOKEN: &str = "API_TOKEN";
pub const USER_ID: &str = "USER_ID";
pub const PROJECT_ID: &str = "PROJECT_ID";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret {0} is not set")]
    Missing(String),
    #[error("Failed to read secret {name} from {path}: {source}")]
    Unreadable {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only access to named secrets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get(&self, name: &str) -> Result<String, SecretError>;
}

/// Secrets from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretProvider;

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get(&self, name: &str) -> Result<String, SecretError> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(SecretError::Missing(name.to_string())),
        }
    }
}

/// Secrets from a mounted directory (e.g. `/run/secrets/API_TOKEN`).
#[derive(Debug, Clone)]
pub struct DirectorySecretProvider {
    root: PathBuf,
}

impl DirectorySecretProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SecretProvider for DirectorySecretProvider {
    async fn get(&self, name: &str) -> Result<String, SecretError> {
        let path = self.root.join(name);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SecretError::Missing(name.to_string()))
            }
            Err(source) => {
                return Err(SecretError::Unreadable {
                    name: name.to_string(),
                    path,
                    source,
                })
            }
        };

        // Mounted secrets commonly end with a newline
        let value = raw.trim_end().to_string();
        if value.is_empty() {
            return Err(SecretError::Missing(name.to_string()));
        }
        debug!(secret = %name, "Loaded secret from directory");
        Ok(value)
    }
}

/// Build the provider selected by configuration.
pub fn from_config(config: &SecretsConfig) -> Arc<dyn SecretProvider> {
    match config.source {
        SecretSource::Env => Arc::new(EnvSecretProvider),
        SecretSource::Directory => Arc::new(DirectorySecretProvider::new(&config.directory)),
    }
}
