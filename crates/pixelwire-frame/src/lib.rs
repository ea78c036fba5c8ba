//! Fixed-layout binary command frames for serial LED controllers.
//!
//! Every frame is a single opcode byte followed by a payload whose length is
//! fixed per opcode and protocol revision:
//! - Pixel ranges and colors are raw bytes
//! - Speeds resolve to a wait byte through a per-effect table
//! - Durations are big-endian 16-bit milliseconds
//!
//! Encoding is pure: no I/O, no validation beyond what the wire layout needs.

pub mod codec;
pub mod command;
pub mod error;
pub mod opcode;
pub mod speed;

pub use codec::{duration_from_secs, encode_command, Frame, ProtocolRevision, MAX_DURATION_MS, MAX_FRAME_LEN};
pub use command::{Color, EffectCommand, EffectLength, PixelRange};
pub use error::{FrameError, Result};
pub use opcode::{
    is_assigned, opcode_name, COLOR_FADE, COLOR_WIPE, PLAYBACK_RECORDING, PROBE, RAINBOW,
    SET_BRIGHTNESS, SHIMMER, SPARKLE, START_RECORDING, STOP_RECORDING, THEATRE_CHASE,
};
pub use speed::{EffectFamily, Pace, SpeedLabel, SpeedTable};
