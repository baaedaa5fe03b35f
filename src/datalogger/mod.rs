pub mod client;
pub mod models;

pub use client::{DataloggerClient, FetchError};
pub use models::Reading;
