//! Submission flows against the file-backed local store

mod helpers;

use appointment_booking::app_state::AppState;
use appointment_booking::config::AppConfig;
use appointment_booking::models::appointment::AppointmentStatus;
use appointment_booking::models::submission::{SubmissionFailure, SubmissionOutcome, SubmissionState};
use appointment_booking::services::{
    local::LocalTransport,
    schema,
    store::{FileStore, KeyValueStore, StoreError},
    theme::Theme,
};
use helpers::*;
use std::sync::Arc;

fn config_for(dir: &tempfile::TempDir) -> AppConfig {
    AppConfig {
        storage_dir: dir.path().to_string_lossy().into_owned(),
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn test_submission_persists_record_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    let state = AppState::from_config(&config).unwrap();

    let outcome = state.coordinator.submit(&valid_form()).await;
    let SubmissionOutcome::Succeeded { record_id, request } = outcome else {
        panic!("expected success");
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let records = LocalTransport::new(store, config.appointments_key.clone())
        .load()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(Some(records[0].id.to_string()), record_id);
    assert_eq!(records[0].status, AppointmentStatus::Pending);
    assert_eq!(records[0].request, request);
    assert_eq!(request.first_name, "Maria");
    assert_eq!(request.last_name, "Lopez Garcia");
}

#[tokio::test]
async fn test_corrupted_slot_recovers_to_single_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    let store = FileStore::open(dir.path()).unwrap();
    store.set(&config.appointments_key, "{not json").unwrap();

    let state = AppState::from_config(&config).unwrap();
    assert!(state.coordinator.submit(&valid_form()).await.is_success());

    let raw = store.get(&config.appointments_key).unwrap().unwrap();
    let list: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_invalid_form_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    let state = AppState::from_config(&config).unwrap();

    let form = valid_form().with(schema::LICENSE_PLATE, "AB12");
    let outcome = state.coordinator.submit(&form).await;

    let SubmissionOutcome::Failed(SubmissionFailure::Validation(errors)) = outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, schema::LICENSE_PLATE);
    assert_eq!(state.store.get(&config.appointments_key).unwrap(), None);
    assert!(matches!(state.coordinator.state(), SubmissionState::Failed { .. }));
}

#[tokio::test]
async fn test_past_date_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::from_config(&config_for(&dir)).unwrap();

    let form = valid_form().with(schema::PREFERRED_DATE, "2001-01-01T10:00");
    let outcome = state.coordinator.submit(&form).await;
    assert!(matches!(
        outcome,
        SubmissionOutcome::Failed(SubmissionFailure::Validation(ref errors))
            if errors.len() == 1 && errors[0].field == schema::PREFERRED_DATE
    ));
}

#[test]
fn test_theme_shares_store_but_not_slot() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    let state = AppState::from_config(&config).unwrap();

    assert_eq!(state.theme.get().unwrap(), Theme::Dark);
    state.theme.set(Theme::Light).unwrap();

    let reopened = AppState::from_config(&config).unwrap();
    assert_eq!(reopened.theme.get().unwrap(), Theme::Light);
    assert_eq!(reopened.store.get(&config.appointments_key).unwrap(), None);
}

#[test]
fn test_configured_phone_policy_applies() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        phone_digits: 10,
        ..config_for(&dir)
    };
    let state = AppState::from_config(&config).unwrap();

    let nine = state.coordinator.validate_field(schema::PHONE, "987654321").unwrap();
    let ten = state.coordinator.validate_field(schema::PHONE, "5551234567").unwrap();
    assert!(!nine.valid);
    assert!(ten.valid);
}

#[test]
fn test_repeated_submissions_append() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let coordinator = coordinator_with(Arc::new(LocalTransport::new(store.clone(), "appointments")));

    tokio_test::block_on(async {
        assert!(coordinator.submit(&valid_form()).await.is_success());
        assert!(coordinator.submit(&valid_form()).await.is_success());
    });

    let records = LocalTransport::new(store, "appointments").load().unwrap();
    assert_eq!(records.len(), 2);
}

/// Reads as empty and refuses every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_local_write_failure_is_transport_failure() {
    let coordinator = coordinator_with(Arc::new(LocalTransport::new(
        Arc::new(ReadOnlyStore),
        "appointments",
    )));
    let form = valid_form();
    let typed = form.clone();

    let outcome = coordinator.submit(&form).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::Failed(SubmissionFailure::Transport(
            "The appointment could not be saved. Please try again.".to_string()
        ))
    );
    assert_eq!(
        coordinator.state(),
        SubmissionState::Failed {
            reason: "The appointment could not be saved. Please try again.".to_string()
        }
    );
    assert_eq!(form, typed);
    assert_eq!(form.get(schema::LICENSE_PLATE), "abc123");
    assert_eq!(form.get(schema::PHONE), "987 654 321");
}
