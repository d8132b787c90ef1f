//! Live algorithm results from QuantConnect.
//!
//! Each read signs a fresh request from the `API_TOKEN` and `USER_ID`
//! secrets and forwards the project's `live/read` response unchanged.

mod auth;
mod client;

pub use auth::{sign_now, sign_request, AuthHeaders};
pub use client::{LiveResults, LiveResultsClient, UpstreamFailure, QUANTCONNECT_API_URL};
