use serde::Serialize;
use std::time::Duration;

use crate::models::appointment::AppointmentRequest;
use crate::models::field::{FieldDecoration, FieldError};

/// Lifecycle stage of the form's single in-flight submission.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded { record_id: Option<String> },
    Failed { reason: String },
}

impl SubmissionState {
    /// Whether a new submission may start.
    pub fn is_ready(&self) -> bool {
        !matches!(self, SubmissionState::Submitting)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Succeeded {
        record_id: Option<String>,
        request: AppointmentRequest,
    },
    Failed(SubmissionFailure),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    /// One entry per rejected field.
    Validation(Vec<FieldError>),
    /// Coarse, user-facing transport message.
    Transport(String),
    /// Another submission is still in flight.
    Busy,
}

impl SubmissionFailure {
    pub fn summary(&self) -> String {
        match self {
            SubmissionFailure::Validation(errors) => {
                format!("{} field(s) need attention", errors.len())
            }
            SubmissionFailure::Transport(message) => message.clone(),
            SubmissionFailure::Busy => "a submission is already in progress".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// One presentation change, applied by whatever adapter renders the form.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum UiEffect {
    DecorateField {
        field: String,
        decoration: FieldDecoration,
    },
    SetLoading {
        loading: bool,
    },
    ShowNotification {
        kind: NotificationKind,
        message: String,
        #[serde(with = "duration_secs")]
        dismiss_after: Duration,
    },
    ResetForm,
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}
