use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Baud rate the controller firmware listens on.
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Callback invoked with every chunk of bytes received from the device.
///
/// Runs on the link's reader context, never under a session lock.
pub type InboundHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Number of stop bits on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopBits {
    One,
    Two,
}

/// Flow control mode on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    None,
    /// RTS/CTS.
    Hardware,
}

/// Line parameters applied when a link is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Line speed in bits per second. Default: 38400.
    pub baud_rate: u32,
    /// Default: one stop bit.
    pub stop_bits: StopBits,
    /// Default: no flow control.
    pub flow_control: FlowControl,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
        }
    }
}

/// A byte link to one controller.
///
/// Sends are fire-and-forget: a successful `send` only means the bytes were
/// handed to the device, not that the controller acted on them.
pub trait SerialLink: Send {
    /// Open the device with the given line parameters.
    ///
    /// `on_inbound` is called for every chunk of received bytes until the
    /// link is closed.
    fn open(&mut self, config: &LinkConfig, on_inbound: InboundHandler) -> Result<()>;

    /// Write a complete frame to the device.
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Close the device. Closing a link that is not open is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Whether the link is currently open.
    fn is_open(&self) -> bool;
}

impl<L: SerialLink + ?Sized> SerialLink for Box<L> {
    fn open(&mut self, config: &LinkConfig, on_inbound: InboundHandler) -> Result<()> {
        (**self).open(config, on_inbound)
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).send(bytes)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}
