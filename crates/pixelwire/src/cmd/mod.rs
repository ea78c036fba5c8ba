use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use pixelwire::frame::{EffectCommand, ProtocolRevision};
use pixelwire::params::ParseConfig;
use pixelwire::session::{CandidateDevice, SessionConfig};
use pixelwire::transport::TtyLink;
use pixelwire::{CommandBuilder, ExtensionError};

use crate::exit::{io_error, CliError, CliResult, DATA_INVALID};
use crate::output::OutputFormat;

pub mod encode;
pub mod names;
pub mod send;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode one effect and print the frame. No device is opened.
    Encode(EncodeArgs),
    /// Connect, send one effect, and shut down.
    Send(SendArgs),
    /// Keep a device connected and print status changes until Ctrl-C.
    Watch(WatchArgs),
    /// List the named rings and colors.
    Names(NamesArgs),
}

pub fn run(command: Command, format: OutputFormat, session: &SessionArgs) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format, session),
        Command::Send(args) => send::run(args, format, session),
        Command::Watch(args) => watch::run(args, format, session),
        Command::Names(args) => names::run(args, format),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum RevisionArg {
    /// Deprecated count-based layout.
    V1,
    V2,
}

impl From<RevisionArg> for ProtocolRevision {
    fn from(arg: RevisionArg) -> Self {
        match arg {
            RevisionArg::V1 => ProtocolRevision::V1,
            RevisionArg::V2 => ProtocolRevision::V2,
        }
    }
}

/// Session and parsing options shared by every subcommand.
///
/// A `--config` file is read first; flags and their environment variables
/// then override single fields.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// JSON session configuration file.
    #[arg(long, value_name = "FILE", env = "PIXELWIRE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Wire protocol revision.
    #[arg(long, value_name = "REV", env = "PIXELWIRE_REVISION", global = true)]
    pub revision: Option<RevisionArg>,

    /// Coerce malformed range/color tokens instead of rejecting them.
    #[arg(long, env = "PIXELWIRE_LEGACY_PARAMS", global = true)]
    pub legacy_params: bool,

    /// Silent heartbeat ticks before a device is dropped.
    #[arg(long, value_name = "N", env = "PIXELWIRE_FAILURE_THRESHOLD", global = true)]
    pub failure_threshold: Option<u32>,

    /// Heartbeat period in milliseconds.
    #[arg(long, value_name = "MS", env = "PIXELWIRE_TICK_INTERVAL_MS", global = true)]
    pub tick_interval_ms: Option<u64>,

    /// Serial baud rate.
    #[arg(long, value_name = "BAUD", env = "PIXELWIRE_BAUD", global = true)]
    pub baud: Option<u32>,
}

impl SessionArgs {
    pub fn session_config(&self) -> CliResult<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
                serde_json::from_str::<SessionConfig>(&text).map_err(|err| {
                    CliError::new(
                        DATA_INVALID,
                        format!("invalid config {}: {err}", path.display()),
                    )
                })?
            }
            None => SessionConfig::default(),
        };

        if let Some(revision) = self.revision {
            config.revision = revision.into();
        }
        if let Some(threshold) = self.failure_threshold {
            config.failure_threshold = threshold;
        }
        if let Some(ms) = self.tick_interval_ms {
            config.tick_interval = std::time::Duration::from_millis(ms);
        }
        if let Some(baud) = self.baud {
            config.link.baud_rate = baud;
        }

        if config.revision.is_deprecated() {
            tracing::warn!(revision = %config.revision, "using deprecated protocol revision");
        }
        Ok(config)
    }

    pub fn parse_config(&self) -> ParseConfig {
        if self.legacy_params {
            ParseConfig::legacy()
        } else {
            ParseConfig::strict()
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub effect: EffectArgs,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Candidate serial device; repeat to give fallbacks in order.
    #[arg(long = "device", short = 'd', value_name = "PATH", required = true)]
    pub devices: Vec<PathBuf>,
    /// How long to leave the effect running before pixels are turned off
    /// (e.g. 3s, 500ms, 0s).
    #[arg(long, default_value = "3s")]
    pub hold: String,
    #[command(subcommand)]
    pub effect: EffectArgs,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Candidate serial device; repeat to give fallbacks in order.
    #[arg(long = "device", short = 'd', value_name = "PATH", required = true)]
    pub devices: Vec<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct NamesArgs {}

#[derive(Subcommand, Debug, Clone)]
pub enum EffectArgs {
    /// Wipe a color across a range, one pixel at a time.
    Wipe(ColorEffectArgs),
    /// Fade a range to a color.
    Fade(ColorEffectArgs),
    /// Cycle a rainbow across a range.
    Rainbow(RainbowArgs),
    /// Theatre-style chasing lights.
    Chase(ChaseArgs),
    /// Random sparkles.
    Sparkle(TimedEffectArgs),
    /// Flickering shimmer.
    Shimmer(TimedEffectArgs),
    /// Set global brightness (0-255).
    Brightness(BrightnessArgs),
    /// Start recording effects on the controller.
    RecordStart,
    /// Stop recording.
    RecordStop,
    /// Play the recording back.
    Playback,
    /// Turn a range off immediately.
    Off(OffArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ColorEffectArgs {
    /// Range token ("0,11") or ring name ("outer ring").
    pub range: String,
    /// Color token ("255,0,0") or color name ("red").
    pub color: String,
    /// slow, medium, fast, or a wait in milliseconds.
    #[arg(long, short = 's', default_value = "medium")]
    pub speed: String,
}

#[derive(Args, Debug, Clone)]
pub struct RainbowArgs {
    pub range: String,
    #[arg(long, short = 's', default_value = "medium")]
    pub speed: String,
    /// Run time in seconds (v2 only).
    #[arg(long)]
    pub duration: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ChaseArgs {
    pub range: String,
    pub color: String,
    #[arg(long, short = 's', default_value = "medium")]
    pub speed: String,
    /// Run time in seconds (v2 only).
    #[arg(long)]
    pub duration: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TimedEffectArgs {
    pub range: String,
    pub color: String,
    /// Seconds on v2, a count on v1.
    pub length: String,
}

#[derive(Args, Debug, Clone)]
pub struct BrightnessArgs {
    pub value: String,
}

#[derive(Args, Debug, Clone)]
pub struct OffArgs {
    #[arg(default_value = "outer ring")]
    pub range: String,
}

pub fn build_command(
    effect: &EffectArgs,
    builder: &CommandBuilder,
) -> Result<EffectCommand, ExtensionError> {
    match effect {
        EffectArgs::Wipe(a) => builder.color_wipe(&a.range, &a.color, &a.speed),
        EffectArgs::Fade(a) => builder.color_fade(&a.range, &a.color, &a.speed),
        EffectArgs::Rainbow(a) => builder.rainbow(&a.range, &a.speed, a.duration.as_deref()),
        EffectArgs::Chase(a) => {
            builder.theatre_chase(&a.range, &a.color, &a.speed, a.duration.as_deref())
        }
        EffectArgs::Sparkle(a) => builder.sparkle(&a.range, &a.color, &a.length),
        EffectArgs::Shimmer(a) => builder.shimmer(&a.range, &a.color, &a.length),
        EffectArgs::Brightness(a) => builder.set_brightness(&a.value),
        EffectArgs::RecordStart => Ok(EffectCommand::StartRecording),
        EffectArgs::RecordStop => Ok(EffectCommand::StopRecording),
        EffectArgs::Playback => Ok(EffectCommand::PlaybackRecording),
        EffectArgs::Off(a) => builder.all_off(&a.range),
    }
}

pub fn candidates(paths: &[PathBuf]) -> CliResult<Vec<CandidateDevice>> {
    Ok(paths
        .iter()
        .map(|path| CandidateDevice::new(path.display().to_string(), TtyLink::new(path)))
        .collect())
}
