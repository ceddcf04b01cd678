// External crates
use clap::Parser;
use tracing::debug;

// Internal imports
use guard_common::tracing_init;
use guard_core::{guard_error, guard_error_with_details, guard_warning, GuardError};

// Local modules
mod cli;
mod commands;

use cli::Args;
use commands::execute_command;

fn main() {
    let args = Args::parse();

    let logging = if args.debug {
        tracing_init::init_with_defaults("debug")
    } else {
        tracing_init::init()
    };
    if logging.is_err() {
        guard_warning!("Failed to initialize logging");
    }
    debug!(command = ?args.command, "starting resource-guard");

    if let Err(e) = execute_command(args) {
        report(&e);
        std::process::exit(1);
    }
}

/// Print the error code, when there is one, and the cause chain.
fn report(err: &anyhow::Error) {
    let headline = match err.downcast_ref::<GuardError>() {
        Some(guard) => format!("Error {}: {}", guard.code(), err),
        None => format!("Error: {}", err),
    };
    let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
    if causes.is_empty() {
        guard_error!("{}", headline);
    } else {
        guard_error_with_details!(headline, causes);
    }
}
