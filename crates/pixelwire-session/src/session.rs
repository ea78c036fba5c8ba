use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pixelwire_frame::Frame;
use pixelwire_transport::TransportError;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::device::CandidateDevice;
use crate::error::SendOutcome;

/// Result of one liveness tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Inbound bytes arrived since the previous tick.
    Alive,
    /// Nothing arrived; a probe was sent.
    Probed { failures: u32 },
    /// The threshold was reached and the link is closed.
    Lost,
}

/// One open connection to a controller.
///
/// Owns the device for its whole lifetime. Any inbound byte counts as a
/// sign of life; the payload is ignored.
pub struct Session {
    device: CandidateDevice,
    generation: u64,
    rx_seen: Arc<AtomicBool>,
    failures: u32,
    threshold: u32,
    open: bool,
}

impl Session {
    /// Open `device` with the configured line parameters.
    ///
    /// On failure the device is dropped.
    pub fn open(
        mut device: CandidateDevice,
        generation: u64,
        config: &SessionConfig,
    ) -> Result<Self, TransportError> {
        info!(device = device.id(), "connecting");

        let rx_seen = Arc::new(AtomicBool::new(false));
        let flag = rx_seen.clone();
        device.link_mut().open(
            &config.link,
            Arc::new(move |bytes: &[u8]| {
                if !bytes.is_empty() {
                    flag.store(true, Ordering::Release);
                }
            }),
        )?;

        info!(device = device.id(), generation, "connected");
        Ok(Self {
            device,
            generation,
            rx_seen,
            failures: 0,
            threshold: config.threshold(),
            open: true,
        })
    }

    pub fn device_id(&self) -> &str {
        self.device.id()
    }

    /// Identifies this session among all sessions of one arbitrator.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Consecutive ticks without inbound bytes.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Run one liveness tick.
    pub fn tick(&mut self) -> Liveness {
        if !self.open {
            return Liveness::Lost;
        }

        if self.rx_seen.swap(false, Ordering::AcqRel) {
            if self.failures > 0 {
                debug!(device = self.device.id(), "inbound bytes seen; failure count reset");
            }
            self.failures = 0;
            return Liveness::Alive;
        }

        self.send(&Frame::probe());
        self.failures += 1;
        debug!(
            device = self.device.id(),
            failures = self.failures,
            threshold = self.threshold,
            "probe sent"
        );

        if self.failures >= self.threshold {
            warn!(
                device = self.device.id(),
                failures = self.failures,
                "liveness timeout"
            );
            self.close();
            return Liveness::Lost;
        }

        Liveness::Probed {
            failures: self.failures,
        }
    }

    /// Write a frame. Fire-and-forget: nothing is awaited from the device.
    pub fn send(&mut self, frame: &Frame) -> SendOutcome {
        if !self.open {
            return SendOutcome::Dropped;
        }
        match self.device.link_mut().send(frame.as_bytes()) {
            Ok(()) => SendOutcome::Sent,
            Err(err) => {
                warn!(device = self.device.id(), error = %err, "send failed");
                SendOutcome::Dropped
            }
        }
    }

    /// Close the link. Closing twice is a no-op.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(err) = self.device.link_mut().close() {
            warn!(device = self.device.id(), error = %err, "close failed");
        }
        info!(device = self.device.id(), "disconnected");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("device", &self.device.id())
            .field("generation", &self.generation)
            .field("failures", &self.failures)
            .field("threshold", &self.threshold)
            .field("open", &self.open)
            .finish()
    }
}
