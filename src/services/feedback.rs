//! Translates validation results and submission outcomes into [`UiEffect`]s.
//!
//! Everything here is pure; an adapter applies the effects to the actual
//! presentation layer.

use chrono::NaiveDateTime;
use std::time::Duration;

use crate::models::field::{FieldDecoration, ValidationResult};
use crate::models::submission::{NotificationKind, SubmissionFailure, SubmissionOutcome, UiEffect};

/// How long a notification banner stays up.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

pub const FIX_ERRORS_MESSAGE: &str = "Please fix the errors in the form.";

pub fn decorate(field: &str, result: &ValidationResult) -> UiEffect {
    UiEffect::DecorateField {
        field: field.to_string(),
        decoration: result.decoration(),
    }
}

/// Effects to apply as soon as the request is handed to the transport.
pub fn submitting() -> Vec<UiEffect> {
    vec![UiEffect::SetLoading { loading: true }]
}

/// Decorations for a full validation pass, followed by the loading
/// indicator when every field passed and the request will be sent.
pub fn before_submit(results: &[(String, ValidationResult)]) -> Vec<UiEffect> {
    let mut effects: Vec<UiEffect> = results
        .iter()
        .map(|(field, result)| decorate(field, result))
        .collect();
    if results.iter().all(|(_, result)| result.valid) {
        effects.extend(submitting());
    }
    effects
}

pub fn outcome(outcome: &SubmissionOutcome) -> Vec<UiEffect> {
    match outcome {
        SubmissionOutcome::Succeeded { request, .. } => vec![
            UiEffect::SetLoading { loading: false },
            UiEffect::ResetForm,
            notify(
                NotificationKind::Success,
                format!(
                    "Your appointment is booked for {}. We will contact you soon.",
                    describe_date(&request.preferred_date)
                ),
            ),
        ],
        SubmissionOutcome::Failed(SubmissionFailure::Validation(errors)) => {
            let mut effects: Vec<UiEffect> = errors
                .iter()
                .map(|e| UiEffect::DecorateField {
                    field: e.field.clone(),
                    decoration: FieldDecoration::Error(e.message.clone()),
                })
                .collect();
            effects.push(notify(NotificationKind::Error, FIX_ERRORS_MESSAGE.to_string()));
            effects
        }
        SubmissionOutcome::Failed(SubmissionFailure::Transport(message)) => vec![
            UiEffect::SetLoading { loading: false },
            notify(NotificationKind::Error, message.clone()),
        ],
        // The in-flight submission owns the UI.
        SubmissionOutcome::Failed(SubmissionFailure::Busy) => Vec::new(),
    }
}

fn notify(kind: NotificationKind, message: String) -> UiEffect {
    UiEffect::ShowNotification {
        kind,
        message,
        dismiss_after: NOTIFICATION_TTL,
    }
}

fn describe_date(value: &str) -> String {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map(|when| when.format("%B %-d, %Y at %H:%M").to_string())
        .unwrap_or_else(|_| value.to_string())
}
