use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pixelwire::session::Status;
use pixelwire::Extension;
use tracing::warn;

use crate::cmd::{candidates, SessionArgs, WatchArgs};
use crate::exit::{CliError, CliResult, FAILURE, INTERNAL, SUCCESS};
use crate::output::{print_status, OutputFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(args: WatchArgs, format: OutputFormat, session: &SessionArgs) -> CliResult<i32> {
    let ext = Extension::new(session.session_config()?, session.parse_config());

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    for candidate in candidates(&args.devices)? {
        ext.controller().register(candidate);
    }

    let mut last: Option<Status> = None;
    let mut code = SUCCESS;

    while running.load(Ordering::SeqCst) {
        let status = ext.status();
        if last.as_ref() != Some(&status) {
            print_status(&status, format);
            last = Some(status.clone());
        }

        // Nothing can reconnect once the queue is empty.
        if !status.is_connected() && ext.controller().with_arbitrator(|arb| arb.pending_len()) == 0 {
            warn!("no candidate devices left");
            code = FAILURE;
            break;
        }

        thread::sleep(POLL_INTERVAL);
    }

    ext.shutdown();
    Ok(code)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
