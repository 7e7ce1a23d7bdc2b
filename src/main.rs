//! cmscore CLI entry point
//!
//! Parses arguments, runs the selected command and turns failures into a
//! readable error with suggestions:
//! - `tasks` - render the tabs of a route
//! - `hierarchy` - show the hierarchy entry of a route
//! - `validate` - check local task definitions

use anyhow::Result;
use clap::Parser;
use cmscore::cli;
use cmscore::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
