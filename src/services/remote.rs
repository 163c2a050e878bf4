use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use crate::models::appointment::AppointmentRequest;
use crate::services::transport::{AppointmentTransport, TransportError, TransportReceipt};

/// Client for the remote appointment API.
pub struct RemoteTransport {
    http: Client,
    endpoint: String,
}

impl RemoteTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .user_agent(concat!("appointment-booking/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AppointmentTransport for RemoteTransport {
    fn name(&self) -> &'static str {
        "remote"
    }

    /// POST the request as JSON.
    ///
    /// Success is a 2xx status with a JSON body that carries no `error` field.
    async fn deliver(&self, request: &AppointmentRequest) -> Result<TransportReceipt, TransportError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        let text = response.text().await?;
        let body: Option<Value> = serde_json::from_str(&text).ok();
        let api_error = body.as_ref().and_then(error_message);

        if !status.is_success() {
            let message = api_error
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
            warn!(status = status.as_u16(), error = %message, "Appointment API returned an error status");
            return Err(TransportError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        let Some(body) = body else {
            return Err(TransportError::MalformedResponse(format!(
                "expected JSON body, got {} bytes",
                text.len()
            )));
        };

        if let Some(message) = api_error {
            warn!(status = status.as_u16(), error = %message, "Appointment API reported an error");
            return Err(TransportError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        let record_id = record_id(&body);
        info!(status = status.as_u16(), record_id = ?record_id, "Appointment accepted by API");

        Ok(TransportReceipt { record_id })
    }
}

/// `error` as a string is passed through; any other non-null value is
/// rendered as JSON.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

fn record_id(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
