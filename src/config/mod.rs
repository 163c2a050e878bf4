use garde::Validate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Directory backing the local key-value store.
    #[serde(default = "default_storage_dir")]
    #[garde(length(min = 1))]
    pub storage_dir: String,

    /// Store slot holding the list of appointment records.
    #[serde(default = "default_appointments_key")]
    #[garde(length(min = 1, max = 64))]
    pub appointments_key: String,

    /// Store slot holding the "light"/"dark" theme preference.
    #[serde(default = "default_theme_key")]
    #[garde(length(min = 1, max = 64))]
    pub theme_key: String,

    /// Remote appointment API. When unset, appointments are persisted locally.
    #[serde(default)]
    #[garde(skip)]
    pub api_endpoint: Option<String>,

    /// Remote API request timeout in seconds
    #[serde(default = "default_api_timeout_secs")]
    #[garde(range(min = 1, max = 300))]
    pub api_timeout_secs: u64,

    /// Number of digits a phone number must have (national numbering plan).
    #[serde(default = "default_phone_digits")]
    #[garde(range(min = 4, max = 15))]
    pub phone_digits: usize,

    /// Oldest accepted vehicle model year
    #[serde(default = "default_min_vehicle_year")]
    #[garde(range(min = 1886, max = 2100))]
    pub min_vehicle_year: i64,

    /// Stand-in for the platform's `prefers-color-scheme: light` query.
    #[serde(default)]
    #[garde(skip)]
    pub prefers_light_theme: bool,
}

fn default_storage_dir() -> String {
    ".booking".to_string()
}

fn default_appointments_key() -> String {
    "appointments".to_string()
}

fn default_theme_key() -> String {
    "theme".to_string()
}

fn default_api_timeout_secs() -> u64 {
    30
}

fn default_phone_digits() -> usize {
    9
}

fn default_min_vehicle_year() -> i64 {
    1950
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            appointments_key: default_appointments_key(),
            theme_key: default_theme_key(),
            api_endpoint: None,
            api_timeout_secs: default_api_timeout_secs(),
            phone_digits: default_phone_digits(),
            min_vehicle_year: default_min_vehicle_year(),
            prefers_light_theme: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}
