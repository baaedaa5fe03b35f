//! Unit tests for timestamp normalization.
//!
//! Run with: cargo test --test timestamp_unit_test

use chrono_tz::Africa::Johannesburg;
use chrono_tz::Tz;
use datalogger_dashboard::render::timestamp::{normalize, parse};

#[test]
fn converts_to_display_timezone() {
    // Johannesburg is UTC+2 year-round
    assert_eq!(
        normalize("2024-06-15T09:30:00+00:00", Johannesburg).unwrap(),
        "2024-06-15 11:30:00"
    );
    assert_eq!(
        normalize("2024-03-01T10:00:00+02:00", Johannesburg).unwrap(),
        "2024-03-01 10:00:00"
    );
    // Offset without colon, crossing midnight
    assert_eq!(
        normalize("2024-12-31T23:15:00-0100", Johannesburg).unwrap(),
        "2025-01-01 02:15:00"
    );
}

#[test]
fn normalize_is_deterministic() {
    let first = normalize("2024-03-01T10:00:00+02:00", Johannesburg).unwrap();
    for _ in 0..10 {
        assert_eq!(normalize("2024-03-01T10:00:00+02:00", Johannesburg).unwrap(), first);
    }
}

#[test]
fn honours_configured_timezone() {
    let tz: Tz = "Europe/Zurich".parse().unwrap();
    assert_eq!(
        normalize("2024-01-10T12:00:00+00:00", tz).unwrap(),
        "2024-01-10 13:00:00"
    );
}

#[test]
fn rejects_other_formats() {
    for raw in [
        "",
        "2024-06-15 09:30:00+00:00",
        "2024-06-15T09:30:00",
        "2024-06-15T09:30:00Z",
        "2024-06-15T09:30+00:00",
        "15/06/2024 09:30:00",
    ] {
        let err = normalize(raw, Johannesburg).unwrap_err();
        assert_eq!(err.raw, raw);
    }
}

#[test]
fn parse_keeps_the_instant() {
    let a = parse("2024-06-15T09:30:00+00:00", Johannesburg).unwrap();
    let b = parse("2024-06-15T11:30:00+02:00", Johannesburg).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.timestamp(), 1_718_443_800);
}
