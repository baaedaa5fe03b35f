//! Tests for the datalogger fetcher against a local stand-in API.
//!
//! Run with: cargo test --test datalogger_client_test

mod common;

use std::time::Duration;

use datalogger_dashboard::datalogger::{DataloggerClient, FetchError};
use datalogger_dashboard::devices::Device;
use datalogger_dashboard::services::FetchCache;

use common::Upstream;

#[tokio::test]
async fn builds_device_urls() {
    let client = DataloggerClient::new(&common::test_config("http://logger.test/api/datalogger/")).unwrap();
    assert_eq!(
        client.readings_url(Device::Device3),
        "http://logger.test/api/datalogger/device3/"
    );
}

#[tokio::test]
async fn ok_response_yields_readings() {
    let upstream = Upstream::default();
    let client = DataloggerClient::new(&common::test_config(&upstream.spawn().await)).unwrap();

    let readings = client.fetch(Device::Device1).await.unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].timestamp, "2024-06-15T09:30:00+00:00");
    assert_eq!(readings[0].temperature, 21.5);
    assert_eq!(readings[0].longitude, 18.4);
}

#[tokio::test]
async fn non_200_is_absent_even_with_valid_body() {
    let upstream = Upstream::default();
    let client = DataloggerClient::new(&common::test_config(&upstream.spawn().await)).unwrap();

    assert!(client.fetch(Device::Device2).await.is_none());
    assert!(client.fetch(Device::Device6).await.is_none());
    assert!(matches!(
        client.get_readings(Device::Device2).await,
        Err(FetchError::Status(status)) if status.as_u16() == 500
    ));
}

#[tokio::test]
async fn malformed_body_is_absent() {
    let upstream = Upstream::default();
    let client = DataloggerClient::new(&common::test_config(&upstream.spawn().await)).unwrap();

    assert!(client.fetch(Device::Device4).await.is_none());
    assert!(matches!(
        client.get_readings(Device::Device4).await,
        Err(FetchError::Body(_))
    ));
}

#[tokio::test]
async fn empty_array_is_an_empty_set() {
    let upstream = Upstream::default();
    let client = DataloggerClient::new(&common::test_config(&upstream.spawn().await)).unwrap();

    assert_eq!(client.fetch(Device::Device5).await, Some(Vec::new()));
}

#[tokio::test]
async fn transport_failure_is_absent() {
    let client = DataloggerClient::new(&common::test_config(&common::dead_base_url().await)).unwrap();

    assert!(client.fetch(Device::Device1).await.is_none());
    assert!(matches!(
        client.get_readings(Device::Device1).await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn cache_coalesces_fetches_within_ttl() {
    let upstream = Upstream::default();
    let client = DataloggerClient::new(&common::test_config(&upstream.spawn().await)).unwrap();
    let cache = FetchCache::new(Duration::from_secs(60));

    let (a, b, c) = tokio::join!(
        cache.readings(&client, Device::Device1),
        cache.readings(&client, Device::Device1),
        cache.readings(&client, Device::Device1),
    );
    assert_eq!(a.unwrap().len(), 1);
    assert!(b.is_some() && c.is_some());
    assert_eq!(upstream.hits(), 1);

    assert!(cache.readings(&client, Device::Device1).await.is_some());
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn cache_does_not_keep_failures() {
    let upstream = Upstream::default();
    let client = DataloggerClient::new(&common::test_config(&upstream.spawn().await)).unwrap();
    let cache = FetchCache::new(Duration::from_secs(60));

    assert!(cache.readings(&client, Device::Device2).await.is_none());
    assert!(cache.readings(&client, Device::Device2).await.is_none());
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn zero_ttl_disables_cache() {
    let upstream = Upstream::default();
    let client = DataloggerClient::new(&common::test_config(&upstream.spawn().await)).unwrap();
    let cache = FetchCache::new(Duration::ZERO);

    cache.readings(&client, Device::Device1).await;
    cache.readings(&client, Device::Device1).await;
    assert_eq!(upstream.hits(), 2);
}
