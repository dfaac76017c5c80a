// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the chat backend.
//!
//! Provides [`ResponderClient`], which builds the request, checks the status,
//! and decodes the reply. Every failure becomes [`NilaError::Responder`].

use std::time::Duration;

use nila_config::model::ResponderConfig;
use nila_core::error::NilaError;
use nila_core::types::ChatRequest;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatResponseBody};

/// HTTP client for the `/chat` endpoint.
#[derive(Debug, Clone)]
pub struct ResponderClient {
    client: reqwest::Client,
    base_url: String,
}

impl ResponderClient {
    /// Creates a client from the `[responder]` config section.
    pub fn new(config: &ResponderConfig) -> Result<Self, NilaError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert(
            "user-agent",
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                NilaError::Config(format!("invalid user agent header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NilaError::Responder {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    /// Sends one chat request. No retry.
    pub async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponseBody, NilaError> {
        let response = self
            .client
            .post(self.chat_url())
            .json(request)
            .send()
            .await
            .map_err(|e| NilaError::Responder {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "chat response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "chat backend returned an error status");
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("backend error ({status}): {}", api_err.detail_text()),
                Err(_) => format!("backend returned {status}: {body}"),
            };
            return Err(NilaError::Responder {
                message,
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| NilaError::Responder {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| NilaError::Responder {
            message: format!("failed to parse chat response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Issues a `GET` against the base URL and returns whatever status came back.
    pub async fn probe(&self) -> Result<reqwest::StatusCode, NilaError> {
        self.client
            .get(&self.base_url)
            .send()
            .await
            .map(|r| r.status())
            .map_err(|e| NilaError::Responder {
                message: format!("backend unreachable: {e}"),
                source: Some(Box::new(e)),
            })
    }
}
