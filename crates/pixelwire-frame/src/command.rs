use serde::{Deserialize, Serialize};

use crate::opcode;
use crate::speed::{EffectFamily, Pace};

/// Inclusive pixel range on the strip.
///
/// `start <= end` is not enforced; the controller decides what a reversed
/// range means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: u8,
    pub end: u8,
}

impl PixelRange {
    pub const fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// How long a sparkle or shimmer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectLength {
    /// Run time in milliseconds (protocol v2).
    Duration(u16),
    /// Number of sparkles/shimmers (protocol v1).
    Count(u8),
}

/// A semantic command for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectCommand {
    /// Liveness probe.
    Probe,
    ColorWipe {
        range: PixelRange,
        color: Color,
        pace: Pace,
    },
    ColorFade {
        range: PixelRange,
        color: Color,
        pace: Pace,
    },
    Rainbow {
        range: PixelRange,
        pace: Pace,
        /// Optional run time in milliseconds.
        duration_ms: Option<u16>,
    },
    TheatreChase {
        range: PixelRange,
        color: Color,
        pace: Pace,
        /// Optional run time in milliseconds.
        duration_ms: Option<u16>,
    },
    Sparkle {
        range: PixelRange,
        color: Color,
        length: EffectLength,
    },
    Shimmer {
        range: PixelRange,
        color: Color,
        length: EffectLength,
    },
    SetBrightness {
        brightness: u8,
    },
    StartRecording,
    StopRecording,
    PlaybackRecording,
}

impl EffectCommand {
    /// Turn every pixel in `range` off immediately.
    pub const fn all_off(range: PixelRange) -> Self {
        EffectCommand::ColorWipe {
            range,
            color: Color::BLACK,
            pace: Pace::WaitMs(0),
        }
    }

    /// Leading byte of this command's frame.
    pub const fn opcode(&self) -> u8 {
        match self {
            EffectCommand::Probe => opcode::PROBE,
            EffectCommand::ColorWipe { .. } => opcode::COLOR_WIPE,
            EffectCommand::ColorFade { .. } => opcode::COLOR_FADE,
            EffectCommand::Rainbow { .. } => opcode::RAINBOW,
            EffectCommand::TheatreChase { .. } => opcode::THEATRE_CHASE,
            EffectCommand::Sparkle { .. } => opcode::SPARKLE,
            EffectCommand::Shimmer { .. } => opcode::SHIMMER,
            EffectCommand::SetBrightness { .. } => opcode::SET_BRIGHTNESS,
            EffectCommand::StartRecording => opcode::START_RECORDING,
            EffectCommand::StopRecording => opcode::STOP_RECORDING,
            EffectCommand::PlaybackRecording => opcode::PLAYBACK_RECORDING,
        }
    }

    /// Short stable name, used in logs and errors.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCommand::Probe => "probe",
            EffectCommand::ColorWipe { .. } => "color_wipe",
            EffectCommand::ColorFade { .. } => "color_fade",
            EffectCommand::Rainbow { .. } => "rainbow",
            EffectCommand::TheatreChase { .. } => "theatre_chase",
            EffectCommand::Sparkle { .. } => "sparkle",
            EffectCommand::Shimmer { .. } => "shimmer",
            EffectCommand::SetBrightness { .. } => "set_brightness",
            EffectCommand::StartRecording => "start_recording",
            EffectCommand::StopRecording => "stop_recording",
            EffectCommand::PlaybackRecording => "playback_recording",
        }
    }

    /// The speed family, for commands that carry a wait byte.
    pub const fn family(&self) -> Option<EffectFamily> {
        match self {
            EffectCommand::ColorWipe { .. } => Some(EffectFamily::ColorWipe),
            EffectCommand::ColorFade { .. } => Some(EffectFamily::ColorFade),
            EffectCommand::Rainbow { .. } => Some(EffectFamily::Rainbow),
            EffectCommand::TheatreChase { .. } => Some(EffectFamily::TheatreChase),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speed::SpeedLabel;

    #[test]
    fn all_off_is_black_wipe_without_wait() {
        let cmd = EffectCommand::all_off(PixelRange::new(0, 11));
        assert_eq!(
            cmd,
            EffectCommand::ColorWipe {
                range: PixelRange::new(0, 11),
                color: Color::BLACK,
                pace: Pace::WaitMs(0),
            }
        );
        assert_eq!(cmd.opcode(), opcode::COLOR_WIPE);
    }

    #[test]
    fn only_paced_effects_have_a_family() {
        let wipe = EffectCommand::ColorWipe {
            range: PixelRange::new(0, 11),
            color: Color::new(255, 0, 0),
            pace: Pace::Label(SpeedLabel::Fast),
        };
        assert_eq!(wipe.family(), Some(EffectFamily::ColorWipe));
        assert_eq!(EffectCommand::Probe.family(), None);
        assert_eq!(
            EffectCommand::SetBrightness { brightness: 10 }.family(),
            None
        );
    }

    #[test]
    fn serializes_with_effect_tag() {
        let json = serde_json::to_value(EffectCommand::SetBrightness { brightness: 200 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "effect": "set_brightness", "brightness": 200 })
        );
    }
}
