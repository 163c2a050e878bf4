use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::appointment::{split_full_name, AppointmentRequest, FormSnapshot};
use crate::models::field::{FieldError, FieldSpec, ValidationResult};
use crate::models::submission::{SubmissionFailure, SubmissionOutcome, SubmissionState};
use crate::services::schema;
use crate::services::transport::AppointmentTransport;
use crate::services::validation::Validator;

/// Drives one form from raw input to a recorded appointment.
///
/// Owns the [`SubmissionState`]: the coordinator is its only writer, readers
/// follow it through [`SubmissionCoordinator::subscribe`].
pub struct SubmissionCoordinator {
    form: Vec<FieldSpec>,
    validator: Validator,
    transport: Arc<dyn AppointmentTransport>,
    state: watch::Sender<SubmissionState>,
    in_flight: AtomicBool,
}

/// Releases the in-flight flag however `submit` exits.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SubmissionCoordinator {
    pub fn new(
        form: Vec<FieldSpec>,
        validator: Validator,
        transport: Arc<dyn AppointmentTransport>,
    ) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            form,
            validator,
            transport,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn form(&self) -> &[FieldSpec] {
        &self.form
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Return to `Idle` once the UI has shown a terminal state.
    /// Ignored while a submission is in flight.
    pub fn reset(&self) {
        // Checked and replaced under the channel's lock so a concurrent
        // submit cannot publish `Submitting` in between.
        self.state.send_if_modified(|state| {
            if matches!(state, SubmissionState::Submitting) {
                return false;
            }
            *state = SubmissionState::Idle;
            true
        });
    }

    /// Live validation of one input, e.g. on blur. `None` for unknown fields.
    pub fn validate_field(&self, name: &str, raw: &str) -> Option<ValidationResult> {
        self.form
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| self.validator.validate(spec, raw))
    }

    /// Validate every field without stopping at the first failure.
    pub fn validate_all(&self, snapshot: &FormSnapshot) -> Vec<(String, ValidationResult)> {
        self.form
            .iter()
            .map(|spec| {
                let result = self.validator.validate(spec, snapshot.get(&spec.name));
                (spec.name.clone(), result)
            })
            .collect()
    }

    /// Build the request, or report every rejected field.
    pub fn prepare(&self, snapshot: &FormSnapshot) -> Result<AppointmentRequest, Vec<FieldError>> {
        let mut values = HashMap::new();
        let mut errors = Vec::new();

        for (name, result) in self.validate_all(snapshot) {
            if result.valid {
                values.insert(name, result.normalized_value);
            } else {
                errors.push(FieldError {
                    field: name,
                    message: result.message.unwrap_or_default(),
                });
            }
        }

        if errors.is_empty() {
            Ok(assemble_request(&values))
        } else {
            Err(errors)
        }
    }

    /// Validate, deliver, and publish each state transition.
    ///
    /// The snapshot is only borrowed, so the caller keeps its input for a
    /// retry whatever the outcome.
    pub async fn submit(&self, snapshot: &FormSnapshot) -> SubmissionOutcome {
        let Some(_guard) = self.begin() else {
            debug!("Submission rejected: another one is in flight");
            metrics::counter!("appointment_submissions_total", "outcome" => "busy").increment(1);
            return SubmissionOutcome::Failed(SubmissionFailure::Busy);
        };

        let request = match self.prepare(snapshot) {
            Ok(request) => request,
            Err(errors) => {
                info!(invalid_fields = errors.len(), "Submission blocked by validation");
                metrics::counter!("appointment_submissions_total", "outcome" => "invalid")
                    .increment(1);
                let failure = SubmissionFailure::Validation(errors);
                self.state.send_replace(SubmissionState::Failed {
                    reason: failure.summary(),
                });
                return SubmissionOutcome::Failed(failure);
            }
        };

        self.state.send_replace(SubmissionState::Submitting);
        let transport = self.transport.name();
        let start = Instant::now();
        let delivered = self.transport.deliver(&request).await;
        metrics::histogram!("appointment_transport_seconds", "transport" => transport)
            .record(start.elapsed().as_secs_f64());

        match delivered {
            Ok(receipt) => {
                info!(
                    transport,
                    record_id = ?receipt.record_id,
                    plate = %request.license_plate,
                    "Appointment submitted"
                );
                metrics::counter!("appointment_submissions_total", "outcome" => "succeeded")
                    .increment(1);
                self.state.send_replace(SubmissionState::Succeeded {
                    record_id: receipt.record_id.clone(),
                });
                SubmissionOutcome::Succeeded {
                    record_id: receipt.record_id,
                    request,
                }
            }
            Err(e) => {
                warn!(transport, error = %e, "Appointment delivery failed");
                metrics::counter!("appointment_submissions_total", "outcome" => "failed")
                    .increment(1);
                let message = e.user_message();
                self.state.send_replace(SubmissionState::Failed {
                    reason: message.clone(),
                });
                SubmissionOutcome::Failed(SubmissionFailure::Transport(message))
            }
        }
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }
}

fn assemble_request(values: &HashMap<String, String>) -> AppointmentRequest {
    let value = |name: &str| values.get(name).cloned().unwrap_or_default();
    let optional = |name: &str| values.get(name).filter(|v| !v.is_empty()).cloned();

    let full_name = value(schema::FULL_NAME);
    let (first_name, last_name) = split_full_name(&full_name);

    AppointmentRequest {
        full_name,
        first_name,
        last_name,
        phone: value(schema::PHONE),
        email: optional(schema::EMAIL),
        address: optional(schema::ADDRESS),
        license_plate: value(schema::LICENSE_PLATE),
        vehicle_brand: value(schema::VEHICLE_BRAND),
        vehicle_model: value(schema::VEHICLE_MODEL),
        vehicle_year: optional(schema::VEHICLE_YEAR).and_then(|y| y.parse().ok()),
        vehicle_color: optional(schema::VEHICLE_COLOR),
        preferred_date: value(schema::PREFERRED_DATE),
        problem_description: value(schema::PROBLEM_DESCRIPTION),
    }
}
