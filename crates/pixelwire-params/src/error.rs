/// Errors that can occur while parsing parameter tokens.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// The token is malformed: wrong component count, non-numeric, or out of range.
    #[error("invalid argument '{token}': {reason}")]
    InvalidArgument { token: String, reason: String },

    /// A duration could not be represented on the wire.
    #[error(transparent)]
    Frame(#[from] pixelwire_frame::FrameError),
}

impl ParamError {
    pub(crate) fn invalid(token: &str, reason: impl Into<String>) -> Self {
        ParamError::InvalidArgument {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParamError>;
