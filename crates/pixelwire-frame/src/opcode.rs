//! Opcode bytes.
//!
//! The opcode is the first byte of every frame. Values not listed here are
//! unassigned; 0x05, 0x07 and 0x0B are skipped by the controller firmware.

/// Liveness probe. No payload.
pub const PROBE: u8 = 0x01;

/// Shimmer (random flicker around a base color).
pub const SHIMMER: u8 = 0x02;

/// Color wipe, one pixel at a time.
pub const COLOR_WIPE: u8 = 0x03;

/// Rainbow cycle.
pub const RAINBOW: u8 = 0x04;

/// Theatre-style crawling lights.
pub const THEATRE_CHASE: u8 = 0x06;

/// Start recording subsequent commands on the controller.
pub const START_RECORDING: u8 = 0x08;

/// Stop recording.
pub const STOP_RECORDING: u8 = 0x09;

/// Play the recorded command sequence back.
pub const PLAYBACK_RECORDING: u8 = 0x0A;

/// Global brightness.
pub const SET_BRIGHTNESS: u8 = 0x0C;

/// Random single-pixel sparkles.
pub const SPARKLE: u8 = 0x0D;

/// Fade a range to a color.
pub const COLOR_FADE: u8 = 0x0E;

/// Returns a human-readable name for an opcode.
pub fn opcode_name(opcode: u8) -> &'static str {
    match opcode {
        PROBE => "PROBE",
        SHIMMER => "SHIMMER",
        COLOR_WIPE => "COLOR_WIPE",
        RAINBOW => "RAINBOW",
        THEATRE_CHASE => "THEATRE_CHASE",
        START_RECORDING => "START_RECORDING",
        STOP_RECORDING => "STOP_RECORDING",
        PLAYBACK_RECORDING => "PLAYBACK_RECORDING",
        SET_BRIGHTNESS => "SET_BRIGHTNESS",
        SPARKLE => "SPARKLE",
        COLOR_FADE => "COLOR_FADE",
        _ => "UNASSIGNED",
    }
}

/// Returns true if the opcode is assigned.
pub fn is_assigned(opcode: u8) -> bool {
    opcode_name(opcode) != "UNASSIGNED"
}
