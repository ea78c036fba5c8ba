use crate::codec::ProtocolRevision;

/// Errors that can occur while building a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A duration does not fit the 16-bit millisecond field.
    #[error("duration {seconds}s out of range (0 to 65.535s)")]
    DurationOutOfRange { seconds: f64 },

    /// The command carries a parameter the selected revision cannot express.
    #[error("{command} cannot be encoded for protocol {revision}: {reason}")]
    UnsupportedParameter {
        command: &'static str,
        revision: ProtocolRevision,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, FrameError>;
