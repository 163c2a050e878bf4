use async_trait::async_trait;

use crate::models::appointment::AppointmentRequest;
use crate::services::store::StoreError;

/// What a transport hands back after durably recording a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportReceipt {
    /// Identifier of the created record, when the transport provides one.
    pub record_id: Option<String>,
}

/// Channel that durably records an appointment request.
#[async_trait]
pub trait AppointmentTransport: Send + Sync {
    /// Short name used in logs and metrics labels.
    fn name(&self) -> &'static str;

    async fn deliver(&self, request: &AppointmentRequest) -> Result<TransportReceipt, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Appointment API rejected the request: {message}")]
    Api { status: Option<u16>, message: String },

    #[error("Malformed response from appointment API: {0}")]
    MalformedResponse(String),

    #[error("Local storage failed: {0}")]
    Storage(#[from] StoreError),

    #[error("Failed to encode appointment: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl TransportError {
    /// Single coarse message shown to the user.
    ///
    /// API-provided messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Api { message, .. } => message.clone(),
            TransportError::Http(_) => {
                "Could not reach the booking service. Please try again.".to_string()
            }
            TransportError::MalformedResponse(_) => {
                "The booking service returned an unexpected response.".to_string()
            }
            TransportError::Storage(_) | TransportError::Encode(_) | TransportError::Task(_) => {
                "The appointment could not be saved. Please try again.".to_string()
            }
        }
    }
}
