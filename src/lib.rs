//! Vehicle-Service Appointment Booking
//!
//! Core of the booking form: field validation and input formatting, the
//! submission workflow, delivery to a local key-value store or a remote
//! appointment API, and the persisted theme preference. Presentation is
//! described as [`models::submission::UiEffect`] values for an adapter to apply.

pub mod app_state;
pub mod config;
pub mod models;
pub mod services;
