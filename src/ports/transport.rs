//! Transport port: Trait for the outbound JSON POST to the prediction service.
//!
//! This trait abstracts the HTTP client (reqwest) from the prediction controller,
//! so the controller's status handling and response adaptation can be exercised
//! without a network.

use async_trait::async_trait;

/// Raw reply from the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Undecoded response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures before a complete response was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Connect(String),

    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    Body(String),

    #[error("HTTP client could not be initialized: {0}")]
    Client(String),
}

/// Trait for sending a JSON document to the prediction endpoint.
#[async_trait]
pub trait PredictionTransport: Send + Sync {
    /// POST `body` (already JSON-encoded) to `endpoint` with a JSON content type.
    ///
    /// Any status code is a successful exchange at this level; interpreting
    /// non-2xx replies is the caller's job.
    ///
    /// # Errors
    /// Returns `TransportError` if the request cannot be sent or the body cannot be read.
    async fn post_json(
        &self,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError>;
}

/// Test double that replays one canned reply and records every request.
///
/// Clones share the call log.
#[cfg(test)]
#[derive(Clone)]
pub struct MockTransport {
    reply: std::result::Result<TransportResponse, String>,
    calls: std::sync::Arc<std::sync::Mutex<Vec<(String, Vec<u8>)>>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            reply: Ok(TransportResponse::new(status, body.as_bytes().to_vec())),
            calls: Default::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<u8>)> {
        self.calls.lock().expect("mock lock").clone()
    }
}

#[cfg(test)]
#[async_trait]
impl PredictionTransport for MockTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .expect("mock lock")
            .push((endpoint.to_string(), body));
        self.reply
            .clone()
            .map_err(TransportError::Connect)
    }
}
