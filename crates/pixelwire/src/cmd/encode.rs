use pixelwire::frame::Frame;
use pixelwire::CommandBuilder;

use crate::cmd::{build_command, EncodeArgs, SessionArgs};
use crate::exit::{extension_error, frame_error, CliResult, SUCCESS};
use crate::output::{print_frame, FrameReport, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat, session: &SessionArgs) -> CliResult<i32> {
    let config = session.session_config()?;
    let builder = CommandBuilder::new(session.parse_config(), config.revision);

    let command =
        build_command(&args.effect, &builder).map_err(|err| extension_error("encode failed", err))?;
    let frame =
        Frame::encode(&command, config.revision).map_err(|err| frame_error("encode failed", err))?;

    print_frame(&FrameReport::new(&command, &frame, config.revision), format);
    Ok(SUCCESS)
}
