use std::env;

use chrono_tz::Tz;

use crate::devices::{Device, DeviceCapabilities};

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }

    /// Whether cookies must only travel over HTTPS.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Dashboard credentials
    pub dashboard_username: String,
    pub dashboard_password: String,
    pub session_ttl_seconds: u64,

    // Datalogger API
    pub datalogger_base_url: String,
    pub datalogger_timeout_seconds: u64,
    pub capabilities: DeviceCapabilities,

    // Rendering
    pub display_timezone: Tz,

    // Refresh settings
    pub refresh_interval_seconds: u64,
    pub refresh_max_backoff_seconds: u64,
    pub fetch_cache_ttl_seconds: u64,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Rate limiting
    pub disable_rate_limiting: bool,
    /// Seconds between replenished login attempts, not attempts per second
    pub rate_limit_login_per_second: u64,
    pub rate_limit_login_burst: u32,
    /// Key clients by `X-Forwarded-For` / `X-Real-IP`. Only safe behind a
    /// reverse proxy that overwrites them.
    pub trust_proxy_headers: bool,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the dashboard credentials are not set,
    /// and `ConfigError::Invalid` if the timezone or device list cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let active_devices =
            env::var("ACTIVE_DEVICES").unwrap_or_else(|_| Device::Device1.id().to_string());
        let capabilities = DeviceCapabilities::from_list(&active_devices)
            .map_err(|e| ConfigError::Invalid("ACTIVE_DEVICES", e))?;

        let display_timezone = env::var("DISPLAY_TIMEZONE")
            .unwrap_or_else(|_| "Africa/Johannesburg".to_string())
            .parse::<Tz>()
            .map_err(|e| ConfigError::Invalid("DISPLAY_TIMEZONE", e.to_string()))?;

        Ok(Self {
            // Dashboard credentials
            dashboard_username: env::var("DASHBOARD_USERNAME")
                .map_err(|_| ConfigError::Missing("DASHBOARD_USERNAME"))?,
            dashboard_password: env::var("DASHBOARD_PASSWORD")
                .map_err(|_| ConfigError::Missing("DASHBOARD_PASSWORD"))?,
            session_ttl_seconds: env::var("SESSION_TTL_SECONDS")
                .unwrap_or_else(|_| "43200".to_string())
                .parse()
                .unwrap_or(43_200), // 12 hours idle

            // Datalogger API
            datalogger_base_url: env::var("DATALOGGER_BASE_URL")
                .unwrap_or_else(|_| "https://Phillip.pythonanywhere.com/api/datalogger".to_string()),
            datalogger_timeout_seconds: env::var("DATALOGGER_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            capabilities,

            display_timezone,

            // Refresh settings
            refresh_interval_seconds: env::var("REFRESH_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            refresh_max_backoff_seconds: env::var("REFRESH_MAX_BACKOFF_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            fetch_cache_ttl_seconds: env::var("FETCH_CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),

            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8501".to_string())
                .parse()
                .unwrap_or(8501),

            // Rate limiting
            disable_rate_limiting: env::var("DISABLE_RATE_LIMITING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            rate_limit_login_per_second: env::var("RATE_LIMIT_LOGIN_PER_SECOND")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            rate_limit_login_burst: env::var("RATE_LIMIT_LOGIN_BURST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            trust_proxy_headers: env::var("TRUST_PROXY_HEADERS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
