//! Datalogger Dashboard - session-gated monitoring of water-quality dataloggers
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod datalogger;
pub mod devices;
pub mod error;
pub mod refresh;
pub mod render;
pub mod routes;
pub mod services;
pub mod session;
