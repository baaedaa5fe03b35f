use axum::response::sse::Event;
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

use crate::common::AppState;
use crate::devices::Device;
use crate::refresh::backoff::{Backoff, CycleOutcome};

struct Cycle {
    state: AppState,
    session_id: Uuid,
    device: Device,
    backoff: Backoff,
    shutdown: watch::Receiver<bool>,
    first: bool,
}

/// Stream of `view` events for one device, re-rendered on a timer.
///
/// The first event is sent immediately. The stream ends once the session it
/// was opened under is gone (logout or expiry); dropping it (client
/// disconnect) stops the timer. Server shutdown ends it as well.
pub fn view_events(
    state: AppState,
    session_id: Uuid,
    device: Device,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let backoff = Backoff::new(
        Duration::from_secs(state.config.refresh_interval_seconds),
        Duration::from_secs(state.config.refresh_max_backoff_seconds),
    );

    let shutdown = state.shutdown_signal();

    tracing::debug!(device = %device, session_id = %session_id, "refresh_stream_opened");

    stream::unfold(
        Cycle {
            state,
            session_id,
            device,
            backoff,
            shutdown,
            first: true,
        },
        |mut cycle| async move {
            if cycle.first {
                cycle.first = false;
            } else {
                let delay = cycle.backoff.delay();
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    _ = cycle.shutdown.wait_for(|stopping| *stopping) => {}
                }
            }

            if *cycle.shutdown.borrow() {
                return None;
            }

            if cycle.state.gate.session(&cycle.session_id).await.is_none() {
                tracing::debug!(
                    device = %cycle.device,
                    session_id = %cycle.session_id,
                    "refresh_stream_closed"
                );
                return None;
            }

            let event = run_cycle(&mut cycle).await;
            Some((Ok(event), cycle))
        },
    )
}

async fn run_cycle(cycle: &mut Cycle) -> Event {
    match cycle.state.device_view(cycle.device).await {
        Ok(view) => {
            let delay = cycle.backoff.record(CycleOutcome::of(&view));
            tracing::trace!(device = %cycle.device, next_in = ?delay, "refresh_cycle");
            Event::default()
                .event("view")
                .json_data(&view)
                .unwrap_or_else(|e| error_event(&e.to_string()))
        }
        Err(e) => {
            let delay = cycle.backoff.record(CycleOutcome::Failed);
            tracing::warn!(
                device = %cycle.device,
                error = %e,
                next_in = ?delay,
                "Refresh cycle failed"
            );
            error_event(&e.to_string())
        }
    }
}

fn error_event(message: &str) -> Event {
    Event::default().event("render_error").data(message)
}
