pub mod timestamp;
pub mod view;

pub use timestamp::{normalize, TimestampError};
pub use view::{render, DeviceView};
