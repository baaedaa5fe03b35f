use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::Config;
use crate::datalogger::DataloggerClient;
use crate::devices::{Capability, Device};
use crate::error::AppResult;
use crate::render::{self, DeviceView};
use crate::services::FetchCache;
use crate::session::{SessionGate, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub datalogger: Arc<DataloggerClient>,
    pub fetch_cache: FetchCache,
    pub gate: Arc<SessionGate>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the datalogger HTTP client cannot be created.
    pub fn new(config: Config) -> AppResult<Self> {
        let datalogger = DataloggerClient::new(&config)?;
        let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_seconds));
        let gate = SessionGate::new(&config, sessions);
        let fetch_cache = FetchCache::new(Duration::from_secs(config.fetch_cache_ttl_seconds));

        Ok(Self {
            config: Arc::new(config),
            datalogger: Arc::new(datalogger),
            fetch_cache,
            gate: Arc::new(gate),
            shutdown: Arc::new(watch::Sender::new(false)),
        })
    }

    /// Tell long-lived refresh streams to finish.
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    #[must_use]
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    #[must_use]
    pub fn capability(&self, device: Device) -> Capability {
        self.config.capabilities.get(device)
    }

    /// One fetch-and-render cycle for `device`.
    ///
    /// Devices without telemetry are rendered without touching the upstream API.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Timestamp` if the fetched readings cannot be rendered.
    pub async fn device_view(&self, device: Device) -> AppResult<DeviceView> {
        let capability = self.capability(device);
        let readings = if capability.telemetry {
            self.fetch_cache.readings(&self.datalogger, device).await
        } else {
            None
        };

        let view = render::render(
            device,
            capability,
            readings.as_deref().map(Vec::as_slice),
            self.config.display_timezone,
        )?;
        Ok(view)
    }
}
