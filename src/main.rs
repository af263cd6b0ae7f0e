// A parametric sketch editor core made with the Bevy game engine.

use bevy::prelude::*;
use clap::Parser;
use std::process::ExitCode;

use sketchwright::core::script::tool_listing;
use sketchwright::utils::logger::init_logger;
use sketchwright::{create_app, verify_registry, CliArgs};

fn main() -> ExitCode {
    let cli_args = CliArgs::parse();
    init_logger(cli_args.debug);

    if let Err(e) = verify_registry() {
        error!("Tool registry is inconsistent: {}", e);
        return ExitCode::FAILURE;
    }

    if cli_args.list_tools {
        for line in tool_listing() {
            println!("{line}");
        }
        return ExitCode::SUCCESS;
    }

    let mut app = match create_app(cli_args) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if app.run().is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
