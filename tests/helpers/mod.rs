//! Shared builders for integration tests

#![allow(dead_code)]

use appointment_booking::models::appointment::FormSnapshot;
use appointment_booking::services::{
    schema,
    submission::SubmissionCoordinator,
    transport::AppointmentTransport,
    validation::{ValidationPolicy, Validator},
};
use chrono::{Duration, Local};
use std::sync::Arc;

/// A preferred date safely in the future, in `datetime-local` format.
pub fn future_date() -> String {
    (Local::now() + Duration::days(7))
        .format("%Y-%m-%dT%H:%M")
        .to_string()
}

/// Every field filled with acceptable values.
pub fn valid_form() -> FormSnapshot {
    FormSnapshot::new()
        .with(schema::FULL_NAME, "Maria Lopez Garcia")
        .with(schema::PHONE, "987 654 321")
        .with(schema::EMAIL, "maria@example.com")
        .with(schema::ADDRESS, "Av. Grau 123")
        .with(schema::LICENSE_PLATE, "abc123")
        .with(schema::VEHICLE_BRAND, "Toyota")
        .with(schema::VEHICLE_MODEL, "Corolla")
        .with(schema::VEHICLE_YEAR, "2019")
        .with(schema::VEHICLE_COLOR, "Red")
        .with(schema::PREFERRED_DATE, &future_date())
        .with(schema::PROBLEM_DESCRIPTION, "Engine light is on")
}

pub fn coordinator_with(transport: Arc<dyn AppointmentTransport>) -> SubmissionCoordinator {
    SubmissionCoordinator::new(
        schema::appointment_form(1950),
        Validator::new(ValidationPolicy::default()),
        transport,
    )
}
