use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One sample as returned by `GET {base_url}/{device}/`.
///
/// `timestamp` is kept as sent (`%Y-%m-%dT%H:%M:%S%z`); it is parsed when the
/// set is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reading {
    pub timestamp: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// NTU
    pub turbidity: f64,
    /// μS/cm
    pub conductivity: f64,
    pub latitude: f64,
    pub longitude: f64,
}
