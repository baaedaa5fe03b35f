use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::Config;
use crate::datalogger::models::Reading;
use crate::devices::Device;
use crate::error::{AppError, AppResult};

/// Why a fetch produced no data. Only ever logged; callers see `None`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("Failed to parse response: {0}")]
    Body(#[from] serde_json::Error),
}

pub struct DataloggerClient {
    http_client: Client,
    base_url: String,
}

impl DataloggerClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.datalogger_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.datalogger_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `{base_url}/{device}/`
    #[must_use]
    pub fn readings_url(&self, device: Device) -> String {
        format!("{}/{}/", self.base_url, device.id())
    }

    /// Fetch the full reading set for a device.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure, any status other than 200,
    /// or a body that is not a JSON array of readings.
    pub async fn get_readings(&self, device: Device) -> Result<Vec<Reading>, FetchError> {
        let url = self.readings_url(device);

        let response = self.http_client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(
                device = %device,
                body_preview = %String::from_utf8_lossy(&body).chars().take(200).collect::<String>(),
                "Unparseable readings body"
            );
            FetchError::Body(e)
        })
    }

    /// Fetch a device's readings, collapsing every failure into `None`.
    pub async fn fetch(&self, device: Device) -> Option<Vec<Reading>> {
        match self.get_readings(device).await {
            Ok(readings) => {
                tracing::debug!(device = %device, count = readings.len(), "Readings fetched");
                Some(readings)
            }
            Err(e) => {
                tracing::warn!(device = %device, error = %e, "No data from datalogger API");
                None
            }
        }
    }
}
