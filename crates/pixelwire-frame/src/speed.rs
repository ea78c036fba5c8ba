use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse speed picked from a block menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedLabel {
    Slow,
    Medium,
    Fast,
}

impl SpeedLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SpeedLabel::Slow => "slow",
            SpeedLabel::Medium => "medium",
            SpeedLabel::Fast => "fast",
        }
    }
}

impl fmt::Display for SpeedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeedLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(SpeedLabel::Slow),
            "medium" => Ok(SpeedLabel::Medium),
            "fast" => Ok(SpeedLabel::Fast),
            other => Err(format!("unknown speed '{other}' (expected slow, medium or fast)")),
        }
    }
}

/// How fast an effect animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    /// Resolved through the effect family's own [`SpeedTable`].
    Label(SpeedLabel),
    /// Raw per-step wait in milliseconds, sent as-is.
    WaitMs(u8),
}

impl From<SpeedLabel> for Pace {
    fn from(label: SpeedLabel) -> Self {
        Pace::Label(label)
    }
}

/// Effects whose frames carry a wait byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectFamily {
    ColorWipe,
    ColorFade,
    Rainbow,
    TheatreChase,
}

/// Wait byte (milliseconds per animation step) for each speed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedTable {
    pub slow: u8,
    pub medium: u8,
    pub fast: u8,
}

impl SpeedTable {
    pub const fn wait_for(&self, label: SpeedLabel) -> u8 {
        match label {
            SpeedLabel::Slow => self.slow,
            SpeedLabel::Medium => self.medium,
            SpeedLabel::Fast => self.fast,
        }
    }
}

pub const COLOR_WIPE_SPEEDS: SpeedTable = SpeedTable {
    slow: 60,
    medium: 30,
    fast: 10,
};

pub const COLOR_FADE_SPEEDS: SpeedTable = SpeedTable {
    slow: 100,
    medium: 50,
    fast: 20,
};

pub const RAINBOW_SPEEDS: SpeedTable = SpeedTable {
    slow: 50,
    medium: 20,
    fast: 5,
};

pub const THEATRE_CHASE_SPEEDS: SpeedTable = SpeedTable {
    slow: 150,
    medium: 100,
    fast: 50,
};

impl EffectFamily {
    /// The speed table owned by this family. Tables are never shared.
    pub const fn speeds(self) -> &'static SpeedTable {
        match self {
            EffectFamily::ColorWipe => &COLOR_WIPE_SPEEDS,
            EffectFamily::ColorFade => &COLOR_FADE_SPEEDS,
            EffectFamily::Rainbow => &RAINBOW_SPEEDS,
            EffectFamily::TheatreChase => &THEATRE_CHASE_SPEEDS,
        }
    }

    /// Resolve a pace to the wait byte written on the wire.
    pub const fn wait_byte(self, pace: Pace) -> u8 {
        match pace {
            Pace::Label(label) => self.speeds().wait_for(label),
            Pace::WaitMs(ms) => ms,
        }
    }
}
