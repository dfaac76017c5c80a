// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote responder adapter for the Nila chat backend.
//!
//! This crate implements [`ResponderAdapter`] over a single JSON endpoint:
//! `POST {endpoint}/chat` with `{"message", "user_id"}`, answered by
//! `{"response"}`. One call is one attempt.

pub mod client;
pub mod types;

use async_trait::async_trait;
use nila_config::model::ResponderConfig;
use nila_core::error::NilaError;
use nila_core::traits::{PluginAdapter, ResponderAdapter};
use nila_core::types::{AdapterType, ChatReply, ChatRequest, HealthStatus};
use tracing::{debug, info};

use crate::client::ResponderClient;

/// Remote responder implementing [`ResponderAdapter`] over HTTP.
pub struct HttpResponder {
    client: ResponderClient,
}

impl HttpResponder {
    /// Creates a responder for the endpoint in `config`.
    pub fn new(config: &ResponderConfig) -> Result<Self, NilaError> {
        let client = ResponderClient::new(config)?;
        info!(endpoint = client.base_url(), "remote responder initialized");
        Ok(Self { client })
    }

    /// Base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl PluginAdapter for HttpResponder {
    fn name(&self) -> &str {
        "http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Responder
    }

    async fn health_check(&self) -> Result<HealthStatus, NilaError> {
        match self.client.probe().await {
            Ok(status) if status.is_server_error() => {
                Ok(HealthStatus::Degraded(format!("backend returned {status}")))
            }
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl ResponderAdapter for HttpResponder {
    async fn respond(&self, request: ChatRequest) -> Result<ChatReply, NilaError> {
        debug!(
            user_id = request.user_id.as_str(),
            message_len = request.message.len(),
            "sending chat request"
        );
        let body = self.client.post_chat(&request).await?;
        Ok(ChatReply {
            text: body.response,
        })
    }
}
