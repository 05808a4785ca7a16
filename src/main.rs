use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: htmledit [PATH]\n\nOpens PATH (an HTML file) if given. Set RUST_LOG for logs.";

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let initial = args.next().map(PathBuf::from);
    if initial
        .as_deref()
        .and_then(Path::to_str)
        .is_some_and(|arg| arg == "-h" || arg == "--help")
    {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }
    if args.next().is_some() {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    }

    log::info!("starting htmledit {}", env!("CARGO_PKG_VERSION"));
    match ui::run(initial) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("window failed: {err}");
            eprintln!("htmledit: {err}");
            ExitCode::FAILURE
        }
    }
}
