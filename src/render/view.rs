use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::datalogger::Reading;
use crate::devices::{Capability, Device};
use crate::render::timestamp::{self, TimestampError};

pub const MAP_ZOOM: u8 = 12;

/// Everything the dashboard needs to draw one device.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceView {
    /// Device is not wired to the telemetry API.
    NotActive { device: Device, message: String },
    /// Fetch failed or returned no readings.
    NoData { device: Device, message: String },
    Active { view: ActiveView },
}

impl DeviceView {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ActiveView {
    pub device: Device,
    pub metrics: Vec<MetricCard>,
    pub map: MapView,
    /// Full reading set, oldest first
    pub table: Vec<TableRow>,
    pub chart: ChartData,
}

impl ActiveView {
    /// Most recent row of the table.
    #[must_use]
    pub fn latest(&self) -> Option<&TableRow> {
        self.table.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetricCard {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapView {
    /// `[latitude, longitude]`
    #[schema(value_type = Vec<f64>)]
    pub center: [f64; 2],
    pub zoom: u8,
    pub marker: MapMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapMarker {
    /// `[latitude, longitude]`
    #[schema(value_type = Vec<f64>)]
    pub position: [f64; 2],
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TableRow {
    /// Display-timezone timestamp, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
    /// Unix seconds
    pub epoch: i64,
    pub temperature: f64,
    pub turbidity: f64,
    pub conductivity: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub timestamps: Vec<String>,
    /// Unix seconds, aligned with `timestamps`
    pub epochs: Vec<i64>,
    /// IANA zone the epochs are displayed in, e.g. `Africa/Johannesburg`
    pub timezone: String,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Turn a fetched reading set into the dashboard view for `device`.
///
/// Timestamps are normalized to `tz` and the rows ordered by instant, so the
/// latest reading is the last row. Readings with equal instants keep the
/// order the API sent them in.
///
/// # Errors
///
/// Returns `TimestampError` if any reading carries a malformed timestamp;
/// nothing is rendered in that case.
pub fn render(
    device: Device,
    capability: Capability,
    readings: Option<&[Reading]>,
    tz: Tz,
) -> Result<DeviceView, TimestampError> {
    if !capability.telemetry {
        return Ok(DeviceView::NotActive {
            device,
            message: format!("{device} is not active yet."),
        });
    }

    let readings = match readings {
        Some(r) if !r.is_empty() => r,
        _ => return Ok(no_data(device)),
    };

    let mut table = readings
        .iter()
        .map(|r| table_row(r, tz))
        .collect::<Result<Vec<_>, _>>()?;
    table.sort_by_key(|row| row.epoch);

    let Some(latest) = table.last() else {
        return Ok(no_data(device));
    };

    let metrics = vec![
        MetricCard {
            label: "Temperature (°C)".to_string(),
            value: latest.temperature,
        },
        MetricCard {
            label: "Turbidity (NTU)".to_string(),
            value: latest.turbidity,
        },
        MetricCard {
            label: "Conductivity (μS/cm)".to_string(),
            value: latest.conductivity,
        },
    ];

    let position = [latest.latitude, latest.longitude];
    let map = MapView {
        center: position,
        zoom: MAP_ZOOM,
        marker: MapMarker {
            position,
            label: format!(
                "Device: {device}\nTemperature: {}°C\nTimestamp: {}",
                latest.temperature, latest.timestamp
            ),
        },
    };

    let chart = chart_data(device, &table, tz);

    Ok(DeviceView::Active {
        view: ActiveView {
            device,
            metrics,
            map,
            table,
            chart,
        },
    })
}

fn no_data(device: Device) -> DeviceView {
    DeviceView::NoData {
        device,
        message: format!("No data available for {device}. It may not be activated yet."),
    }
}

fn table_row(reading: &Reading, tz: Tz) -> Result<TableRow, TimestampError> {
    let at = timestamp::parse(&reading.timestamp, tz)?;
    Ok(TableRow {
        timestamp: at.format(timestamp::DISPLAY_FORMAT).to_string(),
        epoch: at.timestamp(),
        temperature: reading.temperature,
        turbidity: reading.turbidity,
        conductivity: reading.conductivity,
        latitude: reading.latitude,
        longitude: reading.longitude,
    })
}

fn chart_data(device: Device, table: &[TableRow], tz: Tz) -> ChartData {
    ChartData {
        title: format!("Readings for {device} Over Time"),
        x_label: "Timestamp".to_string(),
        y_label: "Reading".to_string(),
        timestamps: table.iter().map(|r| r.timestamp.clone()).collect(),
        epochs: table.iter().map(|r| r.epoch).collect(),
        timezone: tz.name().to_string(),
        series: vec![
            ChartSeries {
                name: "temperature".to_string(),
                values: table.iter().map(|r| r.temperature).collect(),
            },
            ChartSeries {
                name: "turbidity".to_string(),
                values: table.iter().map(|r| r.turbidity).collect(),
            },
            ChartSeries {
                name: "conductivity".to_string(),
                values: table.iter().map(|r| r.conductivity).collect(),
            },
        ],
    }
}

/// Write the table as CSV, one row per reading.
///
/// # Errors
///
/// Returns the underlying `csv::Error` if serialization fails.
pub fn table_csv(table: &[TableRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in table {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
