//! Heartbeat driven by a tokio interval instead of a dedicated thread.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::arbitrator::{Arbitrator, TickOutcome};
use crate::controller::lock;

/// Tick `arbitrator` every `interval` until `cancel` fires.
///
/// The first tick happens one full interval after the call. The lock is
/// never held across an await point.
pub fn spawn_async_heartbeat(
    arbitrator: Arc<Mutex<Arbitrator>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("async heartbeat cancelled");
                    return;
                }
                _ = ticker.tick() => {
                    let outcome = lock(&arbitrator).tick();
                    if let TickOutcome::Lost { device, next } = outcome {
                        info!(%device, next = next.as_deref().unwrap_or("none"), "heartbeat ended session");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use pixelwire_transport::MemoryLink;

    use super::*;
    use crate::config::SessionConfig;
    use crate::device::CandidateDevice;

    #[tokio::test]
    async fn async_heartbeat_ends_silent_session() {
        let arbitrator = Arc::new(Mutex::new(Arbitrator::new(SessionConfig {
            failure_threshold: 2,
            ..SessionConfig::default()
        })));
        let (link, handle) = MemoryLink::new();
        lock(&arbitrator).register(CandidateDevice::new("d1", link));

        let cancel = CancellationToken::new();
        let task = spawn_async_heartbeat(arbitrator.clone(), Duration::from_millis(10), cancel.clone());

        let deadline = Instant::now() + Duration::from_secs(5);
        while handle.is_open() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(!handle.is_open());
        assert_eq!(handle.sent().len(), 2);
        assert_eq!(lock(&arbitrator).sessions_lost(), 1);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn cancel_stops_ticking() {
        let arbitrator = Arc::new(Mutex::new(Arbitrator::new(SessionConfig::default())));
        let (link, handle) = MemoryLink::new();
        lock(&arbitrator).register(CandidateDevice::new("d1", link));

        let cancel = CancellationToken::new();
        let task = spawn_async_heartbeat(arbitrator.clone(), Duration::from_secs(60), cancel.clone());
        cancel.cancel();
        task.await.unwrap();

        assert!(handle.sent().is_empty());
        assert!(handle.is_open());
    }
}
