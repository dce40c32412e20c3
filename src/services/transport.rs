//! HTTP transport.
//!
//! One call, one request: no retries and no backoff. Whatever happens on the
//! wire is folded into a [`FetchEnvelope`]; a transport never returns `Err`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    Envelope, FetchEnvelope, HttpConfig, STATUS_OK, STATUS_TRANSPORT_FAILED, WireParams,
};
use crate::utils::with_query;

/// How wire parameters travel to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Query string on a GET request
    #[default]
    Get,
    /// `application/x-www-form-urlencoded` POST body
    PostForm,
    /// JSON object POST body
    PostJson,
}

/// Something that can deliver wire parameters to a host.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, host: &str, method: Method, params: &WireParams) -> FetchEnvelope;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport from HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn execute(
        &self,
        host: &str,
        method: Method,
        params: &WireParams,
    ) -> reqwest::Result<reqwest::Response> {
        let request = match method {
            Method::Get => self.client.get(with_query(host, params)),
            Method::PostForm => self.client.post(host).form(&params.to_pairs()),
            Method::PostJson => self.client.post(host).json(&params.to_json()),
        };
        request.send().await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, host: &str, method: Method, params: &WireParams) -> FetchEnvelope {
        log::debug!("{method:?} {host} ({} params)", params.len());

        let response = match self.execute(host, method, params).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Request to {host} failed: {e}");
                return Envelope::new(STATUS_TRANSPORT_FAILED, String::new(), e.to_string());
            }
        };

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        if status.as_u16() != STATUS_OK {
            log::warn!("{host} answered {status}");
            return Envelope::new(status.as_u16(), String::new(), reason);
        }

        match response.text().await {
            Ok(body) => Envelope::new(STATUS_OK, body, reason),
            Err(e) => {
                log::warn!("Reading body from {host} failed: {e}");
                Envelope::new(STATUS_TRANSPORT_FAILED, String::new(), e.to_string())
            }
        }
    }
}
