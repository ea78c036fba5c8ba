use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use pixelwire_frame::{EffectCommand, Frame};
use tracing::{debug, info, warn};

use crate::arbitrator::{Arbitrator, TickOutcome};
use crate::config::SessionConfig;
use crate::device::CandidateDevice;
use crate::error::{Result, SendOutcome};
use crate::status::Status;

/// Thread-safe front for an [`Arbitrator`] with a built-in heartbeat.
///
/// Each active session gets its own heartbeat thread, started when the
/// session opens and cancelled when it ends. Heartbeat ticks and caller
/// operations are serialized through one lock.
pub struct Controller {
    shared: Arc<Shared>,
}

struct Shared {
    arbitrator: Mutex<Arbitrator>,
    // Always locked after `arbitrator`, never before.
    heartbeat: Mutex<Option<Heartbeat>>,
}

struct Heartbeat {
    generation: u64,
    // Dropping the sender also wakes the thread.
    cancel: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Controller {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                arbitrator: Mutex::new(Arbitrator::new(config)),
                heartbeat: Mutex::new(None),
            }),
        }
    }

    /// Offer a discovered device. See [`Arbitrator::register`].
    pub fn register(&self, candidate: CandidateDevice) {
        self.with_arbitrator(|arb| arb.register(candidate));
    }

    /// Encode and send a command to the active session.
    pub fn send(&self, command: &EffectCommand) -> Result<SendOutcome> {
        self.with_arbitrator(|arb| arb.send(command))
    }

    pub fn send_frame(&self, frame: &Frame) -> SendOutcome {
        self.with_arbitrator(|arb| arb.send_frame(frame))
    }

    pub fn status(&self) -> Status {
        lock(&self.shared.arbitrator).status()
    }

    pub fn config(&self) -> SessionConfig {
        lock(&self.shared.arbitrator).config().clone()
    }

    /// Run `f` under the lock, then start or stop the heartbeat to match the
    /// resulting session.
    pub fn with_arbitrator<R>(&self, f: impl FnOnce(&mut Arbitrator) -> R) -> R {
        let mut arb = lock(&self.shared.arbitrator);
        let result = f(&mut arb);
        sync_heartbeat(&self.shared, &arb);
        result
    }

    /// Turn the pixels off, close the session and stop the heartbeat.
    ///
    /// Blocks until the heartbeat thread has exited. Idempotent.
    pub fn shutdown(&self) {
        let heartbeat = {
            let mut arb = lock(&self.shared.arbitrator);
            arb.shutdown();
            lock(&self.shared.heartbeat).take()
        };

        if let Some(heartbeat) = heartbeat {
            let _ = heartbeat.cancel.send(());
            if heartbeat.handle.join().is_err() {
                warn!("heartbeat thread panicked");
            }
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("status", &self.status())
            .finish()
    }
}

/// Make the heartbeat slot match the arbitrator's active session.
///
/// A replaced heartbeat is cancelled but not joined: it may be the calling
/// thread, or it may be waiting for the lock the caller holds.
fn sync_heartbeat(shared: &Arc<Shared>, arb: &Arbitrator) {
    let wanted = arb.active_generation();
    let mut slot = lock(&shared.heartbeat);

    if slot.as_ref().map(|hb| hb.generation) == wanted {
        return;
    }

    if let Some(old) = slot.take() {
        let _ = old.cancel.send(());
        debug!(generation = old.generation, "heartbeat cancelled");
    }

    let Some(generation) = wanted else {
        return;
    };

    let interval = arb.config().tick_interval;
    let (cancel, cancelled) = mpsc::channel();
    let weak = Arc::downgrade(shared);
    let spawned = thread::Builder::new()
        .name(format!("pixelwire-heartbeat-{generation}"))
        .spawn(move || run_heartbeat(weak, generation, interval, cancelled));

    match spawned {
        Ok(handle) => {
            debug!(generation, interval_ms = interval.as_millis() as u64, "heartbeat started");
            *slot = Some(Heartbeat {
                generation,
                cancel,
                handle,
            });
        }
        Err(err) => warn!(error = %err, "failed to start heartbeat thread"),
    }
}

fn run_heartbeat(
    shared: Weak<Shared>,
    generation: u64,
    interval: Duration,
    cancelled: mpsc::Receiver<()>,
) {
    loop {
        match cancelled.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut arb = lock(&shared.arbitrator);
        if arb.active_generation() != Some(generation) {
            return;
        }

        if let TickOutcome::Lost { device, next } = arb.tick() {
            info!(%device, next = next.as_deref().unwrap_or("none"), "heartbeat ended session");
            sync_heartbeat(&shared, &arb);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use pixelwire_frame::PixelRange;
    use pixelwire_transport::{MemoryLink, MemoryLinkHandle};

    use super::*;

    fn controller(threshold: u32) -> Controller {
        Controller::new(SessionConfig {
            tick_interval: Duration::from_millis(10),
            failure_threshold: threshold,
            ..SessionConfig::default()
        })
    }

    fn device(id: &str) -> (CandidateDevice, MemoryLinkHandle) {
        let (link, handle) = MemoryLink::new();
        (CandidateDevice::new(id, link), handle)
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn heartbeat_drops_silent_device_and_moves_on() {
        let ctl = controller(2);
        let (d1, h1) = device("d1");
        let (d2, h2) = device("d2");
        ctl.register(d1);
        ctl.register(d2);
        assert_eq!(ctl.status(), Status::connected("d1"));

        assert!(wait_until(|| h2.open_count() == 1));
        assert!(!h1.is_open());
        assert_eq!(h1.sent().len(), 2);
        assert!(h1.sent().iter().all(|frame| frame.as_ref() == [0x01]));

        assert!(wait_until(|| !ctl.status().is_connected()));
        assert_eq!(h2.open_count(), 1);
        assert_eq!(ctl.with_arbitrator(|arb| arb.sessions_lost()), 2);
    }

    #[test]
    fn heartbeat_starts_for_late_registration() {
        let ctl = controller(1);
        assert!(!ctl.status().is_connected());

        let (d1, h1) = device("d1");
        ctl.register(d1);
        assert!(wait_until(|| !h1.is_open()));
        assert_eq!(h1.sent().len(), 1);
    }

    #[test]
    fn shutdown_stops_heartbeat_and_turns_off() {
        let ctl = controller(1_000);
        let (d1, h1) = device("d1");
        ctl.register(d1);
        assert!(wait_until(|| !h1.sent().is_empty()));

        ctl.shutdown();
        let sent = h1.sent();
        assert_eq!(sent.last().unwrap().as_ref(), &[0x03, 0, 11, 0, 0, 0, 0]);
        assert!(!h1.is_open());

        let count = sent.len();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(h1.sent().len(), count);

        ctl.shutdown();
        assert!(!ctl.status().is_connected());
    }

    #[test]
    fn send_goes_through_lock() {
        let ctl = controller(1_000);
        let (d1, h1) = device("d1");
        ctl.register(d1);

        let outcome = ctl
            .send(&EffectCommand::all_off(PixelRange::new(12, 19)))
            .unwrap();
        assert_eq!(outcome, SendOutcome::Sent);
        assert!(h1
            .sent()
            .iter()
            .any(|frame| frame.as_ref() == [0x03, 12, 19, 0, 0, 0, 0]));
    }

    #[test]
    fn drop_closes_active_link() {
        let (d1, h1) = device("d1");
        {
            let ctl = controller(1_000);
            ctl.register(d1);
            assert!(h1.is_open());
        }
        assert!(!h1.is_open());
    }
}
