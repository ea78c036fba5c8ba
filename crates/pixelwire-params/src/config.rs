use serde::{Deserialize, Serialize};

/// How malformed tokens are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Reject malformed tokens with [`crate::ParamError::InvalidArgument`].
    #[default]
    Strict,
    /// Coerce the way the block host's byte arrays did: non-numeric or
    /// missing components become 0, out-of-range values wrap modulo 256,
    /// extra components are ignored.
    Legacy,
}

/// Controls token parsing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub mode: ParseMode,
}

impl ParseConfig {
    pub const fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
        }
    }

    pub const fn legacy() -> Self {
        Self {
            mode: ParseMode::Legacy,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.mode == ParseMode::Legacy
    }
}
