pub mod admin;
pub mod auth;
pub mod chat;
pub mod friends;
pub mod profile;
pub mod registry;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;

use crate::config::Endpoints;
use crate::error::{AppError, AppResult};

/// Shared HTTP state for all facade calls.
pub struct ApiClient {
    pub(crate) client: Client,
    pub(crate) endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Resolve a response per the backend's error convention: any 2xx passes
/// through, otherwise the body's `error` field becomes the surfaced message,
/// with `fallback` covering bodies that carry no usable message.
pub(crate) async fn check(res: Response, fallback: &str) -> AppResult<Response> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let message = res
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| fallback.to_string());

    Err(AppError::api(message).with_details(format!("status {}", status)))
}
