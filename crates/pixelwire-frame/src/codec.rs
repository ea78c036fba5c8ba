use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::command::{Color, EffectCommand, EffectLength, PixelRange};
use crate::error::{FrameError, Result};
use crate::speed::{EffectFamily, Pace};

/// Longest frame any revision produces: theatre chase with a duration.
pub const MAX_FRAME_LEN: usize = 9;

/// Largest duration the 16-bit field can carry, in milliseconds.
pub const MAX_DURATION_MS: u16 = u16::MAX;

/// Wire layout revision.
///
/// Opcode values are identical across revisions; payload layouts are not.
///
/// | Opcode | v2 (default) | v1 (deprecated) |
/// |---|---|---|
/// | 0x02 shimmer | start,end,r,g,b,durHi,durLo | r,g,b,count |
/// | 0x04 rainbow | start,end,wait,[durHi,durLo] | start,end,wait |
/// | 0x06 chase | start,end,r,g,b,wait,[durHi,durLo] | start,end,r,g,b,wait |
/// | 0x0D sparkle | start,end,r,g,b,durHi,durLo | r,g,b,count |
///
/// All other opcodes share one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolRevision {
    /// Count-based sparkle/shimmer, no durations.
    V1,
    #[default]
    V2,
}

impl ProtocolRevision {
    pub fn as_str(self) -> &'static str {
        match self {
            ProtocolRevision::V1 => "v1",
            ProtocolRevision::V2 => "v2",
        }
    }

    /// Whether this revision is kept only for old firmware.
    pub fn is_deprecated(self) -> bool {
        matches!(self, ProtocolRevision::V1)
    }
}

impl fmt::Display for ProtocolRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolRevision {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ProtocolRevision::V1),
            "v2" | "2" => Ok(ProtocolRevision::V2),
            other => Err(format!("unknown protocol revision '{other}'")),
        }
    }
}

/// An encoded command, ready for the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Encode `command` for `revision`.
    pub fn encode(command: &EffectCommand, revision: ProtocolRevision) -> Result<Self> {
        let mut buf = BytesMut::with_capacity(MAX_FRAME_LEN);
        encode_command(command, revision, &mut buf)?;
        Ok(Self {
            bytes: buf.freeze(),
        })
    }

    /// The single-byte liveness probe.
    pub fn probe() -> Self {
        Self {
            bytes: Bytes::from_static(&[crate::opcode::PROBE]),
        }
    }

    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Convert seconds to the millisecond duration field, rounding down.
pub fn duration_from_secs(seconds: f64) -> Result<u16> {
    let millis = (seconds * 1000.0).floor();
    if !millis.is_finite() || millis < 0.0 || millis > f64::from(MAX_DURATION_MS) {
        return Err(FrameError::DurationOutOfRange { seconds });
    }
    Ok(millis as u16)
}

/// Encode a command into its wire frame.
///
/// Wire format:
/// ```text
/// ┌─────────────┬───────────────────────────────────────────┐
/// │ Opcode (1B) │ Payload (fixed per opcode and revision)   │
/// └─────────────┴───────────────────────────────────────────┘
/// ```
/// Durations are written big-endian (high byte first). On error nothing is
/// appended to `dst`.
pub fn encode_command(
    command: &EffectCommand,
    revision: ProtocolRevision,
    dst: &mut BytesMut,
) -> Result<()> {
    let start = dst.len();
    let result = put_command(command, revision, dst);
    if result.is_err() {
        dst.truncate(start);
    }
    result
}

fn put_command(command: &EffectCommand, revision: ProtocolRevision, dst: &mut BytesMut) -> Result<()> {
    dst.reserve(MAX_FRAME_LEN);
    dst.put_u8(command.opcode());

    match *command {
        EffectCommand::Probe
        | EffectCommand::StartRecording
        | EffectCommand::StopRecording
        | EffectCommand::PlaybackRecording => {}
        EffectCommand::ColorWipe { range, color, pace } => {
            put_range(dst, range);
            put_color(dst, color);
            dst.put_u8(EffectFamily::ColorWipe.wait_byte(pace));
        }
        EffectCommand::ColorFade { range, color, pace } => {
            put_range(dst, range);
            put_color(dst, color);
            dst.put_u8(EffectFamily::ColorFade.wait_byte(pace));
        }
        EffectCommand::Rainbow {
            range,
            pace,
            duration_ms,
        } => {
            put_range(dst, range);
            dst.put_u8(EffectFamily::Rainbow.wait_byte(pace));
            put_optional_duration(dst, command, revision, duration_ms)?;
        }
        EffectCommand::TheatreChase {
            range,
            color,
            pace,
            duration_ms,
        } => {
            put_range(dst, range);
            put_color(dst, color);
            dst.put_u8(EffectFamily::TheatreChase.wait_byte(pace));
            put_optional_duration(dst, command, revision, duration_ms)?;
        }
        EffectCommand::Sparkle {
            range,
            color,
            length,
        }
        | EffectCommand::Shimmer {
            range,
            color,
            length,
        } => put_timed_effect(dst, command, revision, range, color, length)?,
        EffectCommand::SetBrightness { brightness } => dst.put_u8(brightness),
    }

    tracing::trace!(command = command.name(), %revision, "encoded frame");
    Ok(())
}

fn put_range(dst: &mut BytesMut, range: PixelRange) {
    dst.put_u8(range.start);
    dst.put_u8(range.end);
}

fn put_color(dst: &mut BytesMut, color: Color) {
    dst.put_u8(color.red);
    dst.put_u8(color.green);
    dst.put_u8(color.blue);
}

fn put_optional_duration(
    dst: &mut BytesMut,
    command: &EffectCommand,
    revision: ProtocolRevision,
    duration_ms: Option<u16>,
) -> Result<()> {
    match (revision, duration_ms) {
        (_, None) => Ok(()),
        (ProtocolRevision::V2, Some(ms)) => {
            dst.put_u16(ms);
            Ok(())
        }
        (ProtocolRevision::V1, Some(_)) => Err(FrameError::UnsupportedParameter {
            command: command.name(),
            revision,
            reason: "durations are not part of this revision",
        }),
    }
}

fn put_timed_effect(
    dst: &mut BytesMut,
    command: &EffectCommand,
    revision: ProtocolRevision,
    range: PixelRange,
    color: Color,
    length: EffectLength,
) -> Result<()> {
    match (revision, length) {
        (ProtocolRevision::V2, EffectLength::Duration(ms)) => {
            put_range(dst, range);
            put_color(dst, color);
            dst.put_u16(ms);
            Ok(())
        }
        // v1 frames address the whole strip; the range is not carried.
        (ProtocolRevision::V1, EffectLength::Count(count)) => {
            put_color(dst, color);
            dst.put_u8(count);
            Ok(())
        }
        (ProtocolRevision::V2, EffectLength::Count(_)) => Err(FrameError::UnsupportedParameter {
            command: command.name(),
            revision,
            reason: "expects a duration, not a count",
        }),
        (ProtocolRevision::V1, EffectLength::Duration(_)) => {
            Err(FrameError::UnsupportedParameter {
                command: command.name(),
                revision,
                reason: "expects a count, not a duration",
            })
        }
    }
}
