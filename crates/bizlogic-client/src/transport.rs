//! The transport seam between the cache and the REST API.
//!
//! [`Transport`] is the generic client the cache consumes: single-shot
//! JSON requests, no internal retry. [`HttpTransport`] is the reqwest
//! implementation used by the binary; tests substitute recording fakes.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::TransportError;

/// A JSON-over-HTTP client.
pub trait Transport: Send + Sync {
    /// `GET url`, returning the decoded JSON body.
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// `GET url?key=value&...`, returning the decoded JSON body.
    fn get_with_search_params(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// `PUT url` with a JSON body.
    fn put(&self, url: &str, body: &Value)
        -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// `POST url` with a JSON body.
    fn post(&self, url: &str, body: &Value)
        -> impl Future<Output = Result<Value, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, TransportError>> + Send {
        (**self).get(url)
    }

    fn get_with_search_params(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        (**self).get_with_search_params(url, params)
    }

    fn put(
        &self,
        url: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        (**self).put(url, body)
    }

    fn post(
        &self,
        url: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        (**self).post(url, body)
    }
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| TransportError::Request {
                url: config.api_url.clone(),
                reason: format!("client setup failed: {err}"),
            })?;
        Ok(HttpTransport { client })
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, TransportError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| TransportError::Request {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|err| TransportError::Request {
            url: url.to_string(),
            reason: format!("response read failed: {err}"),
        })?;

        if !status.is_success() {
            tracing::warn!("{} answered {}", url, status);
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: body_text,
            });
        }

        if body_text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body_text).map_err(|err| TransportError::Decode {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Value, TransportError> {
        tracing::debug!("GET {}", url);
        self.send(url, self.client.get(url)).await
    }

    async fn get_with_search_params(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Value, TransportError> {
        tracing::debug!("GET {} {:?}", url, params);
        self.send(url, self.client.get(url).query(params)).await
    }

    async fn put(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        tracing::debug!("PUT {}", url);
        self.send(url, self.client.put(url).json(body)).await
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        tracing::debug!("POST {}", url);
        self.send(url, self.client.post(url).json(body)).await
    }
}
