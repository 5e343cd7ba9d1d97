//! reqwest implementation of the prediction transport.
//!
//! No request timeout is configured: a stalled service keeps the pending
//! prediction waiting.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::ports::{PredictionTransport, TransportError, TransportResponse};

/// HTTP transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the underlying HTTP client.
    ///
    /// # Errors
    /// Returns `TransportError::Client` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (shared connection pool).
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PredictionTransport for HttpTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        tracing::debug!(bytes = body.len(), "POST prediction request");

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    TransportError::Connect(e.to_string())
                } else {
                    TransportError::Request(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        tracing::debug!(status, bytes = body.len(), "Prediction service replied");

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_constructs() {
        assert!(HttpTransport::new().is_ok());
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_request_error() {
        let transport = HttpTransport::new().expect("Should build");
        let err = transport
            .post_json("not a url", b"{}".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }
}
