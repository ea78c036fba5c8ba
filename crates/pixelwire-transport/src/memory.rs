use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{InboundHandler, LinkConfig, SerialLink};

#[derive(Default)]
struct MemoryState {
    open: bool,
    config: Option<LinkConfig>,
    handler: Option<InboundHandler>,
    sent: Vec<Bytes>,
    opens: usize,
    closes: usize,
    refuse_open: bool,
}

/// In-memory serial link.
///
/// Records every frame it is asked to send and lets the paired
/// [`MemoryLinkHandle`] play the controller side: inject inbound bytes,
/// inspect sent frames, or refuse the next `open`.
pub struct MemoryLink {
    state: Arc<Mutex<MemoryState>>,
}

/// Controller-side view of a [`MemoryLink`].
#[derive(Clone)]
pub struct MemoryLinkHandle {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLink {
    /// Create a link and the handle observing it.
    pub fn new() -> (Self, MemoryLinkHandle) {
        let state = Arc::new(Mutex::new(MemoryState::default()));
        (
            Self {
                state: state.clone(),
            },
            MemoryLinkHandle { state },
        )
    }
}

fn lock(state: &Mutex<MemoryState>) -> MutexGuard<'_, MemoryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SerialLink for MemoryLink {
    fn open(&mut self, config: &LinkConfig, on_inbound: InboundHandler) -> Result<()> {
        let mut state = lock(&self.state);
        if state.refuse_open {
            return Err(TransportError::Open {
                device: "memory".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "memory link refused open",
                ),
            });
        }
        state.open = true;
        state.config = Some(*config);
        state.handler = Some(on_inbound);
        state.opens += 1;
        debug!(baud = config.baud_rate, "memory link opened");
        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let mut state = lock(&self.state);
        if !state.open {
            return Err(TransportError::Closed);
        }
        state.sent.push(Bytes::copy_from_slice(bytes));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if state.open {
            state.open = false;
            state.handler = None;
            state.closes += 1;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        lock(&self.state).open
    }
}

impl MemoryLinkHandle {
    /// Deliver bytes as if the controller had written them.
    ///
    /// Returns false when the link is closed and nothing was delivered.
    pub fn inject(&self, bytes: &[u8]) -> bool {
        // The handler runs outside the lock, the same way a reader thread would.
        let handler = lock(&self.state).handler.clone();
        match handler {
            Some(handler) => {
                handler(bytes);
                true
            }
            None => false,
        }
    }

    /// All frames sent so far, oldest first.
    pub fn sent(&self) -> Vec<Bytes> {
        lock(&self.state).sent.clone()
    }

    /// Forget recorded frames.
    pub fn clear_sent(&self) {
        lock(&self.state).sent.clear();
    }

    /// Make subsequent `open` calls fail.
    pub fn refuse_open(&self, refuse: bool) {
        lock(&self.state).refuse_open = refuse;
    }

    /// Whether the link is currently open.
    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    /// Line parameters passed to the most recent `open`.
    pub fn last_config(&self) -> Option<LinkConfig> {
        lock(&self.state).config
    }

    /// Number of successful opens.
    pub fn open_count(&self) -> usize {
        lock(&self.state).opens
    }

    /// Number of closes of an open link.
    pub fn close_count(&self) -> usize {
        lock(&self.state).closes
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn records_sent_frames_in_order() {
        let (mut link, handle) = MemoryLink::new();
        link.open(&LinkConfig::default(), Arc::new(|_: &[u8]| {})).unwrap();

        link.send(&[0x01]).unwrap();
        link.send(&[0x0C, 0x80]).unwrap();

        let sent = handle.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].as_ref(), &[0x01]);
        assert_eq!(sent[1].as_ref(), &[0x0C, 0x80]);
    }

    #[test]
    fn send_on_closed_link_fails() {
        let (mut link, _handle) = MemoryLink::new();
        assert!(matches!(link.send(&[0x01]), Err(TransportError::Closed)));
    }

    #[test]
    fn inject_reaches_handler_only_while_open() {
        let (mut link, handle) = MemoryLink::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        link.open(
            &LinkConfig::default(),
            Arc::new(move |bytes: &[u8]| {
                counter.fetch_add(bytes.len(), Ordering::SeqCst);
            }),
        )
        .unwrap();

        assert!(handle.inject(b"ok"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        link.close().unwrap();
        assert!(!handle.inject(b"late"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn refused_open_reports_error() {
        let (mut link, handle) = MemoryLink::new();
        handle.refuse_open(true);

        let result = link.open(&LinkConfig::default(), Arc::new(|_: &[u8]| {}));
        assert!(matches!(result, Err(TransportError::Open { .. })));
        assert!(!handle.is_open());
        assert_eq!(handle.open_count(), 0);
    }

    #[test]
    fn close_is_idempotent() {
        let (mut link, handle) = MemoryLink::new();
        link.open(&LinkConfig::default(), Arc::new(|_: &[u8]| {})).unwrap();
        link.close().unwrap();
        link.close().unwrap();
        assert_eq!(handle.close_count(), 1);
    }
}
