use pixelwire::params::{colors, rings};

use crate::cmd::NamesArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_names, OutputFormat};

pub fn run(_args: NamesArgs, format: OutputFormat) -> CliResult<i32> {
    let rows: Vec<_> = rings()
        .map(|(name, token)| ("ring", name, token))
        .chain(colors().map(|(name, token)| ("color", name, token)))
        .collect();
    print_names(&rows, format);
    Ok(SUCCESS)
}
