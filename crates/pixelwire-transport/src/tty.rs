use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::traits::{FlowControl, InboundHandler, LinkConfig, SerialLink, StopBits};

const READ_CHUNK_SIZE: usize = 256;
/// Upper bound on a blocking read; also how quickly `close` can stop the reader.
const READ_TIMEOUT: Duration = Duration::from_millis(100);
const HANGUP_BACKOFF: Duration = Duration::from_millis(20);

/// Serial link over a device node such as `/dev/ttyUSB0` or `COM3`.
///
/// The port is opened raw, 8N1 with the stop bits and flow control from
/// [`LinkConfig`]. A reader thread forwards inbound bytes to the handler
/// until the link is closed or dropped.
pub struct TtyLink {
    path: PathBuf,
    port: Option<Box<dyn SerialPort>>,
    reader: Option<ReaderThread>,
}

struct ReaderThread {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl TtyLink {
    /// Create a link for the device at `path`. Nothing is opened yet.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            port: None,
            reader: None,
        }
    }

    /// Device path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line settings as reported by the open port.
    pub fn line_settings(&self) -> Result<LinkConfig> {
        let port = self.port.as_ref().ok_or(TransportError::Closed)?;

        let baud_rate = port.baud_rate().map_err(port_io)?;
        let stop_bits = match port.stop_bits().map_err(port_io)? {
            serialport::StopBits::One => StopBits::One,
            serialport::StopBits::Two => StopBits::Two,
        };
        let flow_control = match port.flow_control().map_err(port_io)? {
            serialport::FlowControl::None => FlowControl::None,
            serialport::FlowControl::Hardware => FlowControl::Hardware,
            serialport::FlowControl::Software => {
                return Err(TransportError::Unsupported(
                    "software flow control".to_string(),
                ))
            }
        };

        Ok(LinkConfig {
            baud_rate,
            stop_bits,
            flow_control,
        })
    }

    fn open_error(&self, err: serialport::Error) -> TransportError {
        match err.kind() {
            serialport::ErrorKind::InvalidInput => TransportError::Unsupported(format!(
                "{}: {}",
                self.path.display(),
                err.description
            )),
            _ => TransportError::Open {
                device: self.path.display().to_string(),
                source: err.into(),
            },
        }
    }

    fn stop_reader(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.stop.store(true, Ordering::SeqCst);
            if reader.handle.join().is_err() {
                warn!(path = ?self.path, "tty reader thread panicked");
            }
        }
    }
}

impl SerialLink for TtyLink {
    fn open(&mut self, config: &LinkConfig, on_inbound: InboundHandler) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }

        let port = serialport::new(self.path.to_string_lossy(), config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(match config.stop_bits {
                StopBits::One => serialport::StopBits::One,
                StopBits::Two => serialport::StopBits::Two,
            })
            .flow_control(match config.flow_control {
                FlowControl::None => serialport::FlowControl::None,
                FlowControl::Hardware => serialport::FlowControl::Hardware,
            })
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| self.open_error(e))?;

        let reader_port = port.try_clone().map_err(|e| self.open_error(e))?;
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let path = self.path.clone();
        let handle = thread::Builder::new()
            .name("pixelwire-tty-reader".to_string())
            .spawn(move || read_loop(reader_port, path, thread_stop, on_inbound))
            .map_err(|e| TransportError::Open {
                device: self.path.display().to_string(),
                source: e,
            })?;

        info!(path = ?self.path, baud = config.baud_rate, "opened tty");
        self.port = Some(port);
        self.reader = Some(ReaderThread { stop, handle });
        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(TransportError::Closed)?;

        let mut offset = 0usize;
        while offset < bytes.len() {
            match port.write(&bytes[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        loop {
            match port.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.stop_reader();
        if self.port.take().is_some() {
            debug!(path = ?self.path, "closed tty");
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

impl Drop for TtyLink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for TtyLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyLink")
            .field("path", &self.path)
            .field("open", &self.port.is_some())
            .finish()
    }
}

fn port_io(err: serialport::Error) -> TransportError {
    TransportError::Io(err.into())
}

fn read_loop(
    mut port: Box<dyn SerialPort>,
    path: PathBuf,
    stop: Arc<AtomicBool>,
    on_inbound: InboundHandler,
) {
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    while !stop.load(Ordering::SeqCst) {
        match port.read(&mut chunk) {
            Ok(0) => thread::sleep(HANGUP_BACKOFF),
            Ok(n) => on_inbound(&chunk[..n]),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
                ) => {}
            Err(err) => {
                debug!(?path, error = %err, "tty reader stopped");
                return;
            }
        }
    }
}
