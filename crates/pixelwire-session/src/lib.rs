//! Connection liveness and device arbitration for serial LED controllers.
//!
//! Serial links rarely report an unplugged device, so liveness is polled:
//! every tick the active [`Session`] either sees inbound bytes or sends a
//! probe frame. Too many silent ticks in a row end the session, and the
//! [`Arbitrator`] moves on to the next candidate device.
//!
//! [`Arbitrator`] is a plain state machine driven by explicit calls.
//! [`Controller`] wraps it in a lock and runs the heartbeat on a thread.

pub mod arbitrator;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod session;
pub mod status;

#[cfg(feature = "async")]
pub mod heartbeat_async;

pub use arbitrator::{Arbitrator, TickOutcome};
pub use config::{SessionConfig, DEFAULT_DENY_IDS, DEFAULT_FAILURE_THRESHOLD, DEFAULT_TICK_INTERVAL};
pub use controller::Controller;
pub use device::CandidateDevice;
pub use error::{Result, SendOutcome, SessionError};
pub use session::{Liveness, Session};
pub use status::{ConnectionState, Status};

#[cfg(feature = "async")]
pub use heartbeat_async::spawn_async_heartbeat;
