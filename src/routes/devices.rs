use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{
        sse::{Event, KeepAlive, Sse},
        Response,
    },
    Extension, Json,
};
use futures::Stream;
use serde::Serialize;
use std::convert::Infallible;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::devices::Device;
use crate::error::{AppError, AppResult};
use crate::refresh;
use crate::render::{view, DeviceView};
use crate::session::Session;

fn parse_device(id: &str) -> AppResult<Device> {
    id.parse()
        .map_err(|_| AppError::NotFound(format!("Device '{id}' not found")))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceSummary {
    pub device: Device,
    /// Whether the device is wired to the telemetry API
    pub active: bool,
}

/// List selectable devices
#[utoipa::path(
    get,
    path = "/api/devices",
    responses(
        (status = 200, description = "Devices in selector order", body = Vec<DeviceSummary>),
        (status = 401, description = "Not logged in"),
    ),
    tag = "devices"
)]
pub async fn list_devices(State(state): State<AppState>) -> Json<Vec<DeviceSummary>> {
    let devices = Device::ALL
        .into_iter()
        .map(|device| DeviceSummary {
            device,
            active: state.capability(device).telemetry,
        })
        .collect();
    Json(devices)
}

/// Latest reading, map marker, table and chart for one device
#[utoipa::path(
    get,
    path = "/api/devices/{device}/view",
    params(
        ("device" = String, Path, description = "Device id, device1 to device6"),
    ),
    responses(
        (status = 200, description = "Rendered device view", body = DeviceView),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Unknown device"),
        (status = 502, description = "Readings carry malformed timestamps"),
    ),
    tag = "devices"
)]
pub async fn device_view(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> AppResult<Json<DeviceView>> {
    let device = parse_device(&device)?;
    Ok(Json(state.device_view(device).await?))
}

/// Full reading table as CSV
#[utoipa::path(
    get,
    path = "/api/devices/{device}/readings.csv",
    params(
        ("device" = String, Path, description = "Device id, device1 to device6"),
    ),
    responses(
        (status = 200, description = "CSV with one row per reading", body = String, content_type = "text/csv"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Unknown device, or no data for it"),
        (status = 502, description = "Readings carry malformed timestamps"),
    ),
    tag = "devices"
)]
pub async fn readings_csv(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> AppResult<Response> {
    let device = parse_device(&device)?;

    let table = match state.device_view(device).await? {
        DeviceView::Active { view } => view.table,
        DeviceView::NotActive { message, .. } | DeviceView::NoData { message, .. } => {
            return Err(AppError::NotFound(message));
        }
    };

    let body = view::table_csv(&table).map_err(|e| AppError::Internal(e.to_string()))?;
    let disposition = format!("attachment; filename=\"{device}-readings.csv\"");

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .header(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).map_err(|e| AppError::Internal(e.to_string()))?,
        )
        .body(axum::body::Body::from(body))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Live view updates as Server-Sent Events
///
/// Emits a `view` event carrying a `DeviceView` immediately and then on every
/// refresh tick, or a `render_error` event when the readings cannot be
/// rendered. The stream closes when the session ends.
#[utoipa::path(
    get,
    path = "/api/devices/{device}/stream",
    params(
        ("device" = String, Path, description = "Device id, device1 to device6"),
    ),
    responses(
        (status = 200, description = "Event stream", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Unknown device"),
    ),
    tag = "devices"
)]
pub async fn device_stream(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(device): Path<String>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let device = parse_device(&device)?;
    let events = refresh::view_events(state, session.id, device);
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
