//! Serial link abstraction for addressable-LED controllers.
//!
//! Provides a unified interface over the byte stream that reaches the
//! controller:
//! - Serial device nodes (USB serial adapters, Bluetooth serial ports)
//! - An in-memory link for tests and dry runs
//!
//! This is the lowest layer of pixelwire. Everything else builds on top of
//! the [`SerialLink`] trait provided here.

pub mod error;
pub mod memory;
pub mod traits;
pub mod tty;

pub use error::{Result, TransportError};
pub use memory::{MemoryLink, MemoryLinkHandle};
pub use traits::{FlowControl, InboundHandler, LinkConfig, SerialLink, StopBits, DEFAULT_BAUD_RATE};
pub use tty::TtyLink;
