/// Errors that can occur in serial link operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open or configure the device.
    #[error("failed to open {device}: {source}")]
    Open {
        device: String,
        source: std::io::Error,
    },

    /// An I/O error occurred on the open link.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device rejected a requested line setting.
    #[error("unsupported link setting: {0}")]
    Unsupported(String),

    /// The link is not open.
    #[error("link closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
