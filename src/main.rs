//! Pilot's main application entry point.
//! Handles command-line argument parsing, logger setup and dispatch to the
//! subcommand handlers.

use pilot::{
    cli::{get_args, Args},
    commands,
    error::{default_error_handler, Result},
    prompt::DialoguerPrompter,
    store::{default_base_dir, TemplateStore},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Opens the template store (`$PILOT_STORAGE_DIR` or `~/.pilot`)
/// 2. Resolves settings and runs the requested subcommand
fn run(args: Args) -> Result<()> {
    let prompt = Box::new(DialoguerPrompter::new());
    let store = TemplateStore::open(default_base_dir()?)?;
    let mut stdout = std::io::stdout().lock();

    commands::run(args.command, &store, &*prompt, &mut stdout)
}
