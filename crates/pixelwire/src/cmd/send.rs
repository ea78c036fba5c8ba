use std::thread;
use std::time::Duration;

use pixelwire::frame::Frame;
use pixelwire::Extension;
use tracing::info;

use crate::cmd::{build_command, candidates, SendArgs, SessionArgs};
use crate::exit::{extension_error, frame_error, CliError, CliResult, SUCCESS, TRANSPORT_ERROR, USAGE};
use crate::output::{print_frame, FrameReport, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat, session: &SessionArgs) -> CliResult<i32> {
    let hold = parse_hold(&args.hold)?;
    let config = session.session_config()?;
    let revision = config.revision;
    let ext = Extension::new(config, session.parse_config());

    // Parameters are checked before any device is touched.
    let command = build_command(&args.effect, ext.commands())
        .map_err(|err| extension_error("invalid effect", err))?;
    let frame = Frame::encode(&command, revision).map_err(|err| frame_error("encode failed", err))?;

    for candidate in candidates(&args.devices)? {
        ext.controller().register(candidate);
    }

    let status = ext.status();
    if !status.is_connected() {
        return Err(CliError::new(
            TRANSPORT_ERROR,
            "connect failed: none of the given devices could be opened",
        ));
    }

    let outcome = ext.controller().send_frame(&frame);
    print_frame(
        &FrameReport::new(&command, &frame, revision).delivered(status.device.as_deref(), outcome),
        format,
    );

    if !hold.is_zero() {
        info!(hold_ms = hold.as_millis() as u64, "holding before shutdown");
        thread::sleep(hold);
    }
    ext.shutdown();
    Ok(SUCCESS)
}

/// Parse `3s`, `500ms` or a bare number of seconds. Zero is allowed.
fn parse_hold(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "--hold must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid --hold value: {input}")))?;

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
