use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::services::store::{KeyValueStore, StoreError};

pub const DEFAULT_THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Theme preference persisted in the injected store, independent of
/// appointment data.
pub struct ThemeService {
    store: Arc<dyn KeyValueStore>,
    key: String,
    prefers_light: bool,
}

impl ThemeService {
    /// `prefers_light` is the platform's colour-scheme preference, used while
    /// the user has not chosen a theme.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, prefers_light: bool) -> Self {
        Self {
            store,
            key: key.into(),
            prefers_light,
        }
    }

    fn system_theme(&self) -> Theme {
        if self.prefers_light {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    /// The explicitly chosen theme, if any.
    pub fn stored(&self) -> Result<Option<Theme>, StoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        match Theme::from_str(raw.trim()) {
            Ok(theme) => Ok(Some(theme)),
            Err(_) => {
                warn!(key = %self.key, value = %raw, "Ignoring unrecognized theme preference");
                Ok(None)
            }
        }
    }

    pub fn get(&self) -> Result<Theme, StoreError> {
        Ok(self.stored()?.unwrap_or_else(|| self.system_theme()))
    }

    pub fn set(&self, theme: Theme) -> Result<(), StoreError> {
        debug!(theme = %theme, "Persisting theme preference");
        self.store.set(&self.key, &theme.to_string())
    }

    /// Flip the current theme and persist the result.
    pub fn toggle(&self) -> Result<Theme, StoreError> {
        let next = self.get()?.toggled();
        self.set(next)?;
        Ok(next)
    }

    /// Follow a change of the platform preference. Returns the theme to
    /// apply, which only changes when the user never chose one.
    pub fn system_preference_changed(&mut self, prefers_light: bool) -> Result<Theme, StoreError> {
        self.prefers_light = prefers_light;
        self.get()
    }
}
