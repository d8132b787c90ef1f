//! Time-stamped request signing for the QuantConnect REST API.
//!
//! The API expects `Authorization: Basic base64("{user_id}:{sha256_hex}")`
//! where the hash covers `"{api_token}:{unix_timestamp}"`, plus the same
//! timestamp in a plain `Timestamp` header.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Headers for a single signed request. Not reusable once the timestamp drifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Full `Authorization` header value, including the `Basic ` scheme
    pub authorization: String,
    /// Unix seconds used in the hash
    pub timestamp: String,
}

/// Build authentication headers for `timestamp` (unix seconds).
pub fn sign_request(api_token: &str, user_id: &str, timestamp: i64) -> AuthHeaders {
    let timestamp = timestamp.to_string();

    let mut hasher = Sha256::new();
    hasher.update(api_token.as_bytes());
    hasher.update(b":");
    hasher.update(timestamp.as_bytes());
    let hashed_token = hex::encode(hasher.finalize());

    let credentials = format!("{}:{}", user_id, hashed_token);
    AuthHeaders {
        authorization: format!("Basic {}", BASE64.encode(credentials)),
        timestamp,
    }
}

/// Build authentication headers for the current time.
pub fn sign_now(api_token: &str, user_id: &str) -> AuthHeaders {
    sign_request(api_token, user_id, chrono::Utc::now().timestamp())
}
