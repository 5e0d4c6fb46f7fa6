use clap::CommandFactory;
use shared::error::CommonError;

use crate::cli::Cli;

pub fn cmd_completions(shell: clap_complete::Shell) -> Result<(), CommonError> {
    clap_complete::generate(shell, &mut Cli::command(), "clipnote", &mut std::io::stdout());
    Ok(())
}
