//! Short-lived de-duplication of datalogger fetches.
//!
//! Every open dashboard refreshes about once a second. Without coalescing,
//! N viewers of the same device would send N identical requests upstream per
//! tick. The cache keeps each device's last successful reading set for a
//! window no longer than the refresh interval:
//!
//! | Situation | Behavior |
//! |-----------|----------|
//! | Fresh entry | Served from memory |
//! | No entry, concurrent callers | One upstream request, result shared |
//! | Upstream failure | Not cached, every caller sees `None` |
//! | TTL of zero | Cache disabled, every call goes upstream |

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::datalogger::{DataloggerClient, Reading};
use crate::devices::Device;

pub type ReadingSet = Arc<Vec<Reading>>;

#[derive(Clone)]
pub struct FetchCache {
    entries: Option<Cache<Device, ReadingSet>>,
}

impl FetchCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(Device::ALL.len() as u64)
                .time_to_live(ttl)
                .build()
        });
        Self { entries }
    }

    /// Current reading set for `device`, or `None` if the upstream fetch failed.
    pub async fn readings(&self, client: &DataloggerClient, device: Device) -> Option<ReadingSet> {
        let Some(entries) = &self.entries else {
            return client.fetch(device).await.map(Arc::new);
        };

        match entries
            .try_get_with(device, async {
                client.get_readings(device).await.map(Arc::new)
            })
            .await
        {
            Ok(readings) => Some(readings),
            Err(e) => {
                tracing::warn!(device = %device, error = %e, "No data from datalogger API");
                None
            }
        }
    }
}
