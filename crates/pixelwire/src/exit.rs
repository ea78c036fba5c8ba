use std::fmt;
use std::io;

use pixelwire::frame::FrameError;
use pixelwire::params::ParamError;
use pixelwire::session::SessionError;
use pixelwire::transport::TransportError;
use pixelwire::ExtensionError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { ref source, .. }
            if source.kind() == io::ErrorKind::PermissionDenied =>
        {
            CliError::new(PERMISSION_DENIED, format!("{context}: {err}"))
        }
        TransportError::Unsupported(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::DurationOutOfRange { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::UnsupportedParameter { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

pub fn param_error(context: &str, err: ParamError) -> CliError {
    match err {
        ParamError::Frame(err) => frame_error(context, err),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Transport(err) => transport_error(context, err),
        SessionError::Frame(err) => frame_error(context, err),
    }
}

pub fn extension_error(context: &str, err: ExtensionError) -> CliError {
    match err {
        ExtensionError::Param(err) => param_error(context, err),
        ExtensionError::Session(err) => session_error(context, err),
    }
}

#[cfg(test)]
mod tests {
    use pixelwire::frame::ProtocolRevision;

    use super::*;

    #[test]
    fn invalid_token_is_data_invalid() {
        let err = ParamError::InvalidArgument {
            token: "0,x".to_string(),
            reason: "'x' is not a whole number".to_string(),
        };
        assert_eq!(param_error("encode failed", err).code, DATA_INVALID);
    }

    #[test]
    fn revision_mismatch_is_usage() {
        let err = ExtensionError::Session(SessionError::Frame(FrameError::UnsupportedParameter {
            command: "rainbow",
            revision: ProtocolRevision::V1,
            reason: "durations are not part of this revision",
        }));
        assert_eq!(extension_error("encode failed", err).code, USAGE);
    }

    #[test]
    fn missing_device_is_transport_error() {
        let err = TransportError::Open {
            device: "/dev/ttyUSB9".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(transport_error("open failed", err).code, TRANSPORT_ERROR);
    }
}
