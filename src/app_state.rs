use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::services::{
    local::LocalTransport,
    remote::RemoteTransport,
    schema,
    store::{FileStore, KeyValueStore, StoreError},
    submission::SubmissionCoordinator,
    theme::ThemeService,
    transport::{AppointmentTransport, TransportError},
    validation::{ValidationPolicy, Validator},
};

/// Shared services backing one booking page.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub theme: Arc<ThemeService>,
    pub coordinator: Arc<SubmissionCoordinator>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        theme: ThemeService,
        coordinator: SubmissionCoordinator,
    ) -> Self {
        Self {
            store,
            theme: Arc::new(theme),
            coordinator: Arc::new(coordinator),
        }
    }

    /// Wire every service from configuration.
    ///
    /// Appointments go to the remote API when `api_endpoint` is set and to the
    /// local store otherwise; the theme always lives in the local store.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_dir)?);
        Self::with_store(config, store)
    }

    pub fn with_store(config: &AppConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, StartupError> {
        let transport: Arc<dyn AppointmentTransport> = match &config.api_endpoint {
            Some(endpoint) => {
                tracing::info!(endpoint = %endpoint, "Using remote appointment API");
                Arc::new(RemoteTransport::new(
                    endpoint.clone(),
                    Duration::from_secs(config.api_timeout_secs),
                )?)
            }
            None => {
                tracing::info!(key = %config.appointments_key, "Using local appointment storage");
                Arc::new(LocalTransport::new(store.clone(), config.appointments_key.clone()))
            }
        };

        let validator = Validator::new(ValidationPolicy {
            phone_digits: config.phone_digits,
            now: None,
        });
        let coordinator = SubmissionCoordinator::new(
            schema::appointment_form(config.min_vehicle_year),
            validator,
            transport,
        );
        let theme = ThemeService::new(
            store.clone(),
            config.theme_key.clone(),
            config.prefers_light_theme,
        );

        Ok(Self::new(store, theme, coordinator))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to open local storage: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to build appointment API client: {0}")]
    Transport(#[from] TransportError),
}
