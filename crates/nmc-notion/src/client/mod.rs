//! Notion REST API client.
//!
//! Provides sync HTTP client for the Notion public API with bearer-token
//! authentication.

mod blocks;
mod databases;

use std::time::Duration;

use nmc_config::NotionConfig;
use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use crate::error::NotionError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Notion REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
    version: String,
}

impl NotionClient {
    /// Create client from config values.
    #[must_use]
    pub fn from_config(config: &NotionConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.api_token.clone(),
            version: config.version.clone(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Perform a GET request and decode the JSON response.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NotionError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header())
            .header("Notion-Version", &self.version)
            .header("Accept", "application/json")
            .call()?;

        read_json(response)
    }

    /// Perform a POST request with a JSON body and decode the JSON response.
    fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T, NotionError> {
        let payload_bytes = serde_json::to_vec(payload)?;

        let response = self
            .agent
            .post(url)
            .header("Authorization", &self.auth_header())
            .header("Notion-Version", &self.version)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        read_json(response)
    }
}

/// Map error statuses to [`NotionError::Http`], otherwise decode the body.
fn read_json<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, NotionError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(NotionError::Http {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}
