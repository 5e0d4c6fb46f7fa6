use std::error::Error;

use clap::{Parser, Subcommand};
use shared::error::CommonError;

use crate::commands::{self, serve::ServeParams};

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the clipnote gateway
    Serve(ServeParams),
    /// Print the OpenAPI document for the HTTP surface
    Openapi,
    /// Generate shell completions for clipnote
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Show clipnote version
    Version,
}

fn log_error_chain(err: &dyn Error) {
    let mut current: Option<&dyn Error> = Some(err);

    while let Some(e) = current {
        eprintln!("Caused by: {e}");
        current = e.source();
    }
}

fn handle_error(err: &CommonError) {
    eprintln!("Error: {err}");
    log_error_chain(err);
    ::std::process::exit(1);
}

pub async fn run_cli(cli: Cli) -> Result<(), anyhow::Error> {
    let cmd_res = match cli.command {
        Commands::Serve(params) => commands::serve::cmd_serve(params).await,
        Commands::Openapi => commands::openapi::cmd_openapi(),
        Commands::Completions { shell } => commands::completions::cmd_completions(shell),
        Commands::Version => {
            println!("clipnote CLI version: {CLI_VERSION}");
            Ok(())
        }
    };

    if let Err(e) = cmd_res {
        handle_error(&e);
    }
    Ok(())
}
