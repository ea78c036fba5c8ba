use std::fmt;

use serde::Serialize;

/// Whether a controller is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connected => "Connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection state as reported to the block host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub state: ConnectionState,
    /// Display string for the host's status indicator.
    pub message: String,
    /// Identifier of the connected device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Status {
    pub fn disconnected() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            message: ConnectionState::Disconnected.as_str().to_string(),
            device: None,
        }
    }

    pub fn connected(device: &str) -> Self {
        Self {
            state: ConnectionState::Connected,
            message: ConnectionState::Connected.as_str().to_string(),
            device: Some(device.to_string()),
        }
    }

    /// Host status code: 1 not ready, 2 ready.
    pub fn code(&self) -> u8 {
        match self.state {
            ConnectionState::Disconnected => 1,
            ConnectionState::Connected => 2,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}
