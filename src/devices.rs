//! The fixed set of dataloggers and what each one is wired up to do.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Device1,
    Device2,
    Device3,
    Device4,
    Device5,
    Device6,
}

impl Device {
    pub const ALL: [Self; 6] = [
        Self::Device1,
        Self::Device2,
        Self::Device3,
        Self::Device4,
        Self::Device5,
        Self::Device6,
    ];

    /// Identifier used in URLs and by the upstream API.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Device1 => "device1",
            Self::Device2 => "device2",
            Self::Device3 => "device3",
            Self::Device4 => "device4",
            Self::Device5 => "device5",
            Self::Device6 => "device6",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Device1 => 0,
            Self::Device2 => 1,
            Self::Device3 => 2,
            Self::Device4 => 3,
            Self::Device5 => 4,
            Self::Device6 => 5,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown device '{s}'"))
    }
}

/// What a device is able to serve on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Capability {
    /// Whether the device is wired to the telemetry API.
    pub telemetry: bool,
}

/// Per-device capability table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    table: [Capability; 6],
}

impl DeviceCapabilities {
    /// Build the table from a comma-separated list of devices with telemetry.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first entry that is not a known device.
    pub fn from_list(list: &str) -> Result<Self, String> {
        let mut caps = Self::default();
        for entry in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let device: Device = entry.parse()?;
            caps.table[device.index()].telemetry = true;
        }
        Ok(caps)
    }

    #[must_use]
    pub fn with_telemetry(devices: &[Device]) -> Self {
        let mut caps = Self::default();
        for device in devices {
            caps.table[device.index()].telemetry = true;
        }
        caps
    }

    #[must_use]
    pub fn get(&self, device: Device) -> Capability {
        self.table[device.index()]
    }

    /// Devices wired to the telemetry API, in selector order.
    pub fn active(&self) -> impl Iterator<Item = Device> + '_ {
        Device::ALL
            .into_iter()
            .filter(|d| self.get(*d).telemetry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_device_ids() {
        assert_eq!("device3".parse::<Device>(), Ok(Device::Device3));
        assert_eq!(" DEVICE6 ".parse::<Device>(), Ok(Device::Device6));
        assert!("device7".parse::<Device>().is_err());
        assert!("".parse::<Device>().is_err());
    }

    #[test]
    fn capability_table_from_list() {
        let caps = DeviceCapabilities::from_list("device1, device4,").unwrap();
        assert!(caps.get(Device::Device1).telemetry);
        assert!(caps.get(Device::Device4).telemetry);
        assert!(!caps.get(Device::Device3).telemetry);
        assert_eq!(
            caps.active().collect::<Vec<_>>(),
            vec![Device::Device1, Device::Device4]
        );

        assert!(DeviceCapabilities::from_list("device1,pump").is_err());
        assert_eq!(DeviceCapabilities::from_list("").unwrap().active().count(), 0);
    }
}
