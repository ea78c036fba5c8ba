//! Drive serial NeoPixel controllers from a block-programming host.
//!
//! Blocks hand over text such as `"outer ring"` or `"255,0,0"`; pixelwire
//! parses it, encodes a fixed-layout binary frame, and writes it to the one
//! controller it keeps connected.
//!
//! # Crate Structure
//!
//! - [`transport`]: serial link abstraction, tty and in-memory links
//! - [`frame`]: opcodes, effect commands, and the wire encoder
//! - [`params`]: range, color and duration token parsing
//! - [`session`]: liveness heartbeat and device arbitration
//! - [`Extension`]: one call per block, built on all of the above

pub mod extension;

pub use extension::{CommandBuilder, Extension, ExtensionError};

/// Re-export transport types.
pub mod transport {
    pub use pixelwire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use pixelwire_frame::*;
}

/// Re-export parameter parsing.
pub mod params {
    pub use pixelwire_params::*;
}

/// Re-export session types.
pub mod session {
    pub use pixelwire_session::*;
}
