//! QuantConnect live algorithm results client.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::auth::sign_now;
use crate::config::LiveResultsConfig;
use crate::secrets::{SecretProvider, API_TOKEN, PROJECT_ID, USER_ID};

/// Base URL for the QuantConnect v2 REST API.
pub const QUANTCONNECT_API_URL: &str = "https://www.quantconnect.com/api/v2";

/// Body returned to callers when the upstream answers with a non-200 status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    /// Upstream `errors` field as received
    pub errors: Value,
    pub status_code: u16,
    pub success: bool,
}

impl UpstreamFailure {
    fn new(errors: Value, status_code: u16) -> Self {
        Self {
            errors,
            status_code,
            success: false,
        }
    }
}

/// Outcome of one live results read.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveResults {
    /// Upstream 200; JSON body exactly as received
    Relayed(Vec<u8>),
    /// Upstream answered with an error status
    Upstream(UpstreamFailure),
}

/// Reads live algorithm results for the configured project.
pub struct LiveResultsClient {
    http: Client,
    base_url: String,
    secrets: Arc<dyn SecretProvider>,
}

impl LiveResultsClient {
    /// Create a new client from configuration.
    pub fn new(config: &LiveResultsConfig, secrets: Arc<dyn SecretProvider>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secrets,
        })
    }

    /// Fetch `live/read` for the project named by the `PROJECT_ID` secret.
    ///
    /// A single attempt is made. Upstream error statuses are returned as
    /// [`LiveResults::Upstream`]; only transport, credential, and decode
    /// failures are errors.
    #[instrument(skip(self), name = "qc_live_read")]
    pub async fn fetch(&self) -> Result<LiveResults> {
        let api_token = self.secrets.get(API_TOKEN).await?;
        let user_id = self.secrets.get(USER_ID).await?;
        let project_id = self.secrets.get(PROJECT_ID).await?;

        let headers = sign_now(&api_token, &user_id);
        let url = format!("{}/live/read", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("Authorization", &headers.authorization)
            .header("Timestamp", &headers.timestamp)
            .query(&[("projectId", project_id.as_str())])
            .send()
            .await
            .context("Failed to send live results request")?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("Failed to read live results response")?;

        if status == StatusCode::OK {
            serde_json::from_slice::<serde::de::IgnoredAny>(&body)
                .context("Live results response is not valid JSON")?;
            debug!(bytes = body.len(), "Relaying live results");
            return Ok(LiveResults::Relayed(body.to_vec()));
        }

        let errors = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(|mut b| b.get_mut("errors").map(Value::take))
            .unwrap_or_else(|| json!(["Unknown error"]));
        warn!(status = status.as_u16(), ?errors, "Error fetching live results");

        Ok(LiveResults::Upstream(UpstreamFailure::new(
            errors,
            status.as_u16(),
        )))
    }
}
