//! reqwest-backed [`HttpFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use ecogarden_core::weather::{HttpFetcher, HttpResponse, TransportError};

/// Fetches JSON documents over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::timeout(err.to_string())
    } else {
        TransportError::new(err.to_string())
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        tracing::debug!(%url, status, "HTTP GET completed");

        Ok(HttpResponse::new(status, body))
    }
}
