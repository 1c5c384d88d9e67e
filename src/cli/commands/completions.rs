use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::{Shell, generate};

/// Execute the completions command.
pub fn execute(shell: Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, &mut std::io::stdout());
}
