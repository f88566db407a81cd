use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use tracing::{info, warn};

use crate::config::{Config, ConfigError};
use crate::session::SessionSettings;
use crate::store::{self, StoreError, TodoStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub config: Arc<Config>,
    key: Key,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, config: Config) -> Result<Self, ConfigError> {
        let key = signing_key(config.session_secret.as_deref())?;
        Ok(Self {
            store,
            config: Arc::new(config),
            key,
        })
    }

    /// Open the configured backend and build the state around it.
    pub async fn open(config: Config) -> anyhow::Result<Self> {
        info!("Opening {:?} todo store", config.backend);
        let store = store::open(&config.backend)
            .await
            .map_err(|e: StoreError| anyhow::anyhow!("failed to open todo store: {e}"))?;
        Ok(Self::new(store, config)?)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings::from(self.config.as_ref())
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

fn signing_key(secret: Option<&str>) -> Result<Key, ConfigError> {
    match secret {
        Some(secret) => Key::try_from(secret.as_bytes()).map_err(|e| ConfigError::Invalid {
            key: "SESSION_SECRET",
            value: "<redacted>".to_string(),
            reason: e.to_string(),
        }),
        None => {
            warn!("Generating a random session signing key");
            Ok(Key::generate())
        }
    }
}
