// Query sender
// POSTs a query object as JSON and decodes the JSON answer

use super::config::ClientConfig;
use super::response::QueryResponse;
use crate::error::SendError;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Sends queries to a single endpoint
/// One request per call: no retries
pub struct QuerySender {
    client: Client,
    config: ClientConfig,
}

impl QuerySender {
    pub fn new(config: ClientConfig) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| SendError::Transport {
                endpoint: config.endpoint.clone(),
                source,
            })?;
        Ok(Self { client, config })
    }

    /// Send any serializable query object and decode the response
    ///
    /// Every failure is returned as an error: the transport failing, a
    /// non-success status, or a body that is not JSON.
    pub fn send<T: Serialize + ?Sized>(&self, query: &T) -> Result<QueryResponse, SendError> {
        let body = serde_json::to_string(query).map_err(SendError::Encode)?;
        info!(endpoint = %self.config.endpoint, "sending query: {}", body);

        let transport = |source| SendError::Transport {
            endpoint: self.config.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().map_err(transport)?;
        debug!(status = status.as_u16(), bytes = text.len(), "received response");

        if !status.is_success() {
            let message = Self::error_message(&text);
            warn!(status = status.as_u16(), %message, "query rejected");
            return Err(SendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&text).map_err(SendError::Decode)?;
        Ok(QueryResponse::from_value(value))
    }

    /// The `error` field of a JSON error body, or the raw body
    fn error_message(body: &str) -> String {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => match map.get("error") {
                Some(Value::String(message)) => message.clone(),
                _ => body.to_string(),
            },
            _ => body.to_string(),
        }
    }
}
