//! matls - Inspect MATLAB .mat files as ordered collections of arrays.
//!
//! This tool prints the variable catalog that the matcodec library builds
//! for a file, verifies cached types, and dumps array values.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Action, Args};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .try_init()
        .ok();

    // Run the appropriate command
    if let Err(e) = run(args) {
        output::print_error(&e);
        std::process::exit(1);
    }
}

/// Main dispatch function.
fn run(args: Args) -> Result<()> {
    // Validate arguments
    args.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

    if args.header {
        commands::header::run(&args)?;
    }

    // Dispatch to appropriate command
    match args.action() {
        Action::List => commands::list::run(&args),
        Action::Verify => commands::verify::run(&args),
        Action::Show(index) => commands::show::run(&args, Some(index)),
        Action::ShowAll => commands::show::run(&args, None),
    }
}
