//! Shared fixtures: test configuration and a stand-in datalogger API.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use datalogger_dashboard::config::{Config, Deployment};
use datalogger_dashboard::devices::{Device, DeviceCapabilities};

pub const USERNAME: &str = "operator";
pub const PASSWORD: &str = "s3cret-pass";

pub const SCENARIO_C: &str = r#"[{"timestamp":"2024-06-15T09:30:00+00:00","temperature":21.5,"turbidity":3.2,"conductivity":450.0,"latitude":-33.9,"longitude":18.4}]"#;

/// Well-formed JSON whose timestamp uses `Z`, which the source format rejects.
pub const BAD_TIMESTAMP: &str = r#"[{"timestamp":"2024-06-15T09:30:00Z","temperature":21.5,"turbidity":3.2,"conductivity":450.0,"latitude":-33.9,"longitude":18.4}]"#;

pub fn test_config(base_url: &str) -> Config {
    Config {
        dashboard_username: USERNAME.to_string(),
        dashboard_password: PASSWORD.to_string(),
        session_ttl_seconds: 3600,
        datalogger_base_url: base_url.to_string(),
        datalogger_timeout_seconds: 5,
        capabilities: DeviceCapabilities::with_telemetry(&[
            Device::Device1,
            Device::Device2,
            Device::Device4,
            Device::Device5,
        ]),
        display_timezone: chrono_tz::Africa::Johannesburg,
        refresh_interval_seconds: 1,
        refresh_max_backoff_seconds: 4,
        fetch_cache_ttl_seconds: 0,
        api_host: "127.0.0.1".to_string(),
        api_port: 0,
        disable_rate_limiting: true,
        rate_limit_login_per_second: 1,
        rate_limit_login_burst: 5,
        trust_proxy_headers: false,
        deployment: Deployment::Local,
    }
}

/// Stand-in for the datalogger API.
///
/// - `device1`: 200 with one reading (scenario C)
/// - `device2`: 500 with a well-formed body
/// - `device3`: 200 with a malformed timestamp (unwired unless a test wires it)
/// - `device4`: 200 with a body that is not JSON
/// - `device5`: 200 with an empty array
/// - anything else: 404
#[derive(Clone, Default)]
pub struct Upstream {
    pub hits: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/{device}/", get(readings))
            .with_state(self.clone());
        serve(app).await
    }
}

async fn readings(State(upstream): State<Upstream>, Path(device): Path<String>) -> impl IntoResponse {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    match device.as_str() {
        "device1" => (StatusCode::OK, SCENARIO_C.to_string()),
        "device2" => (StatusCode::INTERNAL_SERVER_ERROR, SCENARIO_C.to_string()),
        "device3" => (StatusCode::OK, BAD_TIMESTAMP.to_string()),
        "device4" => (StatusCode::OK, "<html>maintenance</html>".to_string()),
        "device5" => (StatusCode::OK, "[]".to_string()),
        _ => (StatusCode::NOT_FOUND, SCENARIO_C.to_string()),
    }
}

pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
