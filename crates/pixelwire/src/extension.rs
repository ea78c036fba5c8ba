use pixelwire_frame::{EffectCommand, EffectLength, ProtocolRevision};
use pixelwire_params::{
    parse_byte, parse_duration, parse_pace, resolve_color, resolve_range, ParamError, ParseConfig,
};
use pixelwire_session::{
    CandidateDevice, Controller, SendOutcome, SessionConfig, SessionError, Status,
};
use pixelwire_transport::SerialLink;
use tracing::debug;

/// Errors surfaced to the block host.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// A range, color, speed or duration token was rejected.
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),

    /// The command could not be encoded for the configured revision.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

pub type Result<T> = std::result::Result<T, ExtensionError>;

/// Builds [`EffectCommand`]s from the textual parameters blocks provide.
///
/// Ranges and colors accept either a token (`"0,11"`, `"255,0,0"`) or a
/// menu name (`"outer ring"`, `"red"`). Speeds accept a label or a raw wait
/// in milliseconds. Durations are seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandBuilder {
    parse: ParseConfig,
    revision: ProtocolRevision,
}

impl CommandBuilder {
    pub fn new(parse: ParseConfig, revision: ProtocolRevision) -> Self {
        Self { parse, revision }
    }

    pub fn parse_config(&self) -> ParseConfig {
        self.parse
    }

    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    pub fn color_wipe(&self, range: &str, color: &str, speed: &str) -> Result<EffectCommand> {
        Ok(EffectCommand::ColorWipe {
            range: resolve_range(range, &self.parse)?,
            color: resolve_color(color, &self.parse)?,
            pace: parse_pace(speed, &self.parse)?,
        })
    }

    pub fn color_fade(&self, range: &str, color: &str, speed: &str) -> Result<EffectCommand> {
        Ok(EffectCommand::ColorFade {
            range: resolve_range(range, &self.parse)?,
            color: resolve_color(color, &self.parse)?,
            pace: parse_pace(speed, &self.parse)?,
        })
    }

    pub fn rainbow(&self, range: &str, speed: &str, duration: Option<&str>) -> Result<EffectCommand> {
        Ok(EffectCommand::Rainbow {
            range: resolve_range(range, &self.parse)?,
            pace: parse_pace(speed, &self.parse)?,
            duration_ms: self.optional_duration(duration)?,
        })
    }

    pub fn theatre_chase(
        &self,
        range: &str,
        color: &str,
        speed: &str,
        duration: Option<&str>,
    ) -> Result<EffectCommand> {
        Ok(EffectCommand::TheatreChase {
            range: resolve_range(range, &self.parse)?,
            color: resolve_color(color, &self.parse)?,
            pace: parse_pace(speed, &self.parse)?,
            duration_ms: self.optional_duration(duration)?,
        })
    }

    /// `length` is seconds on v2 and a sparkle count on v1.
    pub fn sparkle(&self, range: &str, color: &str, length: &str) -> Result<EffectCommand> {
        Ok(EffectCommand::Sparkle {
            range: resolve_range(range, &self.parse)?,
            color: resolve_color(color, &self.parse)?,
            length: self.length(length)?,
        })
    }

    /// `length` is seconds on v2 and a shimmer count on v1.
    pub fn shimmer(&self, range: &str, color: &str, length: &str) -> Result<EffectCommand> {
        Ok(EffectCommand::Shimmer {
            range: resolve_range(range, &self.parse)?,
            color: resolve_color(color, &self.parse)?,
            length: self.length(length)?,
        })
    }

    pub fn set_brightness(&self, brightness: &str) -> Result<EffectCommand> {
        Ok(EffectCommand::SetBrightness {
            brightness: parse_byte(brightness, &self.parse)?,
        })
    }

    /// Turn every pixel in `range` off.
    pub fn all_off(&self, range: &str) -> Result<EffectCommand> {
        Ok(EffectCommand::all_off(resolve_range(range, &self.parse)?))
    }

    fn optional_duration(&self, duration: Option<&str>) -> Result<Option<u16>> {
        match duration {
            Some(token) => Ok(Some(parse_duration(token, &self.parse)?)),
            None => Ok(None),
        }
    }

    fn length(&self, token: &str) -> Result<EffectLength> {
        let length = match self.revision {
            ProtocolRevision::V1 => EffectLength::Count(parse_byte(token, &self.parse)?),
            ProtocolRevision::V2 => EffectLength::Duration(parse_duration(token, &self.parse)?),
        };
        Ok(length)
    }
}

/// The surface a block host calls into.
///
/// Every effect method parses its parameters, encodes the frame and hands
/// it to the connected controller. Parameter errors are reported before
/// anything is sent. With no controller connected the frame is dropped and
/// the call still succeeds.
#[derive(Debug)]
pub struct Extension {
    controller: Controller,
    commands: CommandBuilder,
}

impl Extension {
    pub fn new(session: SessionConfig, parse: ParseConfig) -> Self {
        let commands = CommandBuilder::new(parse, session.revision);
        Self {
            controller: Controller::new(session),
            commands,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn commands(&self) -> &CommandBuilder {
        &self.commands
    }

    /// Hook for the transport layer's device discovery.
    pub fn on_device_discovered(&self, id: &str, link: impl SerialLink + 'static) {
        self.controller.register(CandidateDevice::new(id, link));
    }

    pub fn color_wipe(&self, range: &str, color: &str, speed: &str) -> Result<SendOutcome> {
        self.dispatch(self.commands.color_wipe(range, color, speed)?)
    }

    pub fn color_fade(&self, range: &str, color: &str, speed: &str) -> Result<SendOutcome> {
        self.dispatch(self.commands.color_fade(range, color, speed)?)
    }

    pub fn rainbow(&self, range: &str, speed: &str, duration: Option<&str>) -> Result<SendOutcome> {
        self.dispatch(self.commands.rainbow(range, speed, duration)?)
    }

    pub fn theatre_chase(
        &self,
        range: &str,
        color: &str,
        speed: &str,
        duration: Option<&str>,
    ) -> Result<SendOutcome> {
        self.dispatch(self.commands.theatre_chase(range, color, speed, duration)?)
    }

    pub fn sparkle(&self, range: &str, color: &str, length: &str) -> Result<SendOutcome> {
        self.dispatch(self.commands.sparkle(range, color, length)?)
    }

    pub fn shimmer(&self, range: &str, color: &str, length: &str) -> Result<SendOutcome> {
        self.dispatch(self.commands.shimmer(range, color, length)?)
    }

    pub fn set_brightness(&self, brightness: &str) -> Result<SendOutcome> {
        self.dispatch(self.commands.set_brightness(brightness)?)
    }

    pub fn start_recording(&self) -> Result<SendOutcome> {
        self.dispatch(EffectCommand::StartRecording)
    }

    pub fn stop_recording(&self) -> Result<SendOutcome> {
        self.dispatch(EffectCommand::StopRecording)
    }

    pub fn playback_recording(&self) -> Result<SendOutcome> {
        self.dispatch(EffectCommand::PlaybackRecording)
    }

    pub fn all_off(&self, range: &str) -> Result<SendOutcome> {
        self.dispatch(self.commands.all_off(range)?)
    }

    pub fn status(&self) -> Status {
        self.controller.status()
    }

    pub fn shutdown(&self) {
        self.controller.shutdown();
    }

    fn dispatch(&self, command: EffectCommand) -> Result<SendOutcome> {
        let outcome = self.controller.send(&command)?;
        debug!(effect = command.name(), ?outcome, "block command dispatched");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use pixelwire_frame::FrameError;
    use pixelwire_transport::{MemoryLink, MemoryLinkHandle};

    use super::*;

    fn connected(parse: ParseConfig, revision: ProtocolRevision) -> (Extension, MemoryLinkHandle) {
        let ext = Extension::new(
            SessionConfig {
                revision,
                failure_threshold: 1_000,
                ..SessionConfig::default()
            },
            parse,
        );
        let (link, handle) = MemoryLink::new();
        ext.on_device_discovered("/dev/ttyUSB0", link);
        (ext, handle)
    }

    fn last_sent(handle: &MemoryLinkHandle) -> Vec<u8> {
        handle
            .sent()
            .last()
            .map(|frame| frame.to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn wipe_with_names_and_tokens_encode_alike() {
        let (ext, handle) = connected(ParseConfig::strict(), ProtocolRevision::V2);

        ext.color_wipe("0,11", "255,0,0", "fast").unwrap();
        let by_token = last_sent(&handle);
        ext.color_wipe("outer ring", "red", "Fast").unwrap();
        let by_name = last_sent(&handle);

        assert_eq!(by_token, vec![0x03, 0, 11, 255, 0, 0, 10]);
        assert_eq!(by_name, by_token);
    }

    #[test]
    fn sparkle_seconds_become_big_endian_millis() {
        let (ext, handle) = connected(ParseConfig::strict(), ProtocolRevision::V2);
        ext.sparkle("inner ring", "white", "5.2").unwrap();
        assert_eq!(last_sent(&handle), vec![0x0D, 12, 19, 255, 255, 255, 20, 80]);
    }

    #[test]
    fn v1_shimmer_takes_a_count() {
        let (ext, handle) = connected(ParseConfig::strict(), ProtocolRevision::V1);
        ext.shimmer("0,11", "blue", "7").unwrap();
        assert_eq!(last_sent(&handle), vec![0x02, 0, 0, 255, 7]);
    }

    #[test]
    fn v1_rejects_rainbow_duration() {
        let (ext, handle) = connected(ParseConfig::strict(), ProtocolRevision::V1);
        let err = ext.rainbow("0,11", "slow", Some("3")).unwrap_err();
        assert!(matches!(
            err,
            ExtensionError::Session(SessionError::Frame(FrameError::UnsupportedParameter { .. }))
        ));
        assert!(handle.sent().is_empty());
    }

    #[test]
    fn strict_rejects_malformed_color_without_sending() {
        let (ext, handle) = connected(ParseConfig::strict(), ProtocolRevision::V2);
        let err = ext.color_fade("0,11", "255,zero,0", "slow").unwrap_err();
        assert!(matches!(
            err,
            ExtensionError::Param(ParamError::InvalidArgument { .. })
        ));
        assert!(handle.sent().is_empty());
    }

    #[test]
    fn legacy_coerces_malformed_tokens() {
        let (ext, handle) = connected(ParseConfig::legacy(), ProtocolRevision::V2);
        ext.color_fade("0", "256,zero,-1", "medium").unwrap();
        assert_eq!(last_sent(&handle), vec![0x0E, 0, 0, 0, 0, 255, 50]);
    }

    #[test]
    fn chase_with_duration_is_longest_frame() {
        let (ext, handle) = connected(ParseConfig::strict(), ProtocolRevision::V2);
        ext.theatre_chase("all rings", "purple", "medium", Some("2"))
            .unwrap();
        assert_eq!(
            last_sent(&handle),
            vec![0x06, 0, 19, 128, 0, 255, 100, 0x07, 0xD0]
        );
    }

    #[test]
    fn single_byte_commands() {
        let (ext, handle) = connected(ParseConfig::strict(), ProtocolRevision::V2);
        ext.start_recording().unwrap();
        ext.stop_recording().unwrap();
        ext.playback_recording().unwrap();
        ext.set_brightness("40").unwrap();

        let sent: Vec<Vec<u8>> = handle.sent().iter().map(|f| f.to_vec()).collect();
        assert_eq!(sent, vec![vec![0x08], vec![0x09], vec![0x0A], vec![0x0C, 40]]);
    }

    #[test]
    fn sends_without_device_are_dropped() {
        let ext = Extension::new(SessionConfig::default(), ParseConfig::strict());
        assert_eq!(ext.rainbow("0,11", "fast", None).unwrap(), SendOutcome::Dropped);
        assert_eq!(ext.status(), Status::disconnected());
    }

    #[test]
    fn shutdown_turns_off_and_disconnects() {
        let (ext, handle) = connected(ParseConfig::strict(), ProtocolRevision::V2);
        assert!(ext.status().is_connected());

        ext.shutdown();
        ext.shutdown();

        assert_eq!(last_sent(&handle), vec![0x03, 0, 11, 0, 0, 0, 0]);
        assert!(!handle.is_open());
        assert_eq!(ext.status().code(), 1);
    }

    #[test]
    fn builder_alone_needs_no_device() {
        let builder = CommandBuilder::new(ParseConfig::strict(), ProtocolRevision::V2);
        assert_eq!(
            builder.all_off("inner ring").unwrap(),
            EffectCommand::all_off(pixelwire_frame::PixelRange::new(12, 19))
        );
        assert!(builder.set_brightness("300").is_err());
    }
}
