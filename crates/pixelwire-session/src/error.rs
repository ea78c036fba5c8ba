/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] pixelwire_transport::TransportError),

    /// The command could not be encoded.
    #[error("frame error: {0}")]
    Frame(#[from] pixelwire_frame::FrameError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// What happened to a frame handed to a session.
///
/// There is no acknowledgement from the controller, so `Sent` only means
/// the link accepted the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// No session was open, or the link rejected the write.
    Dropped,
}
