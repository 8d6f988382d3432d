//! `regseal completions`: print a shell completion script to stdout.
//!
//!   regseal completions bash > ~/.bash_completion.d/regseal

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    render(shell, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn render(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        render(shell, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bash_script_knows_every_subcommand() {
        let bash = script(Shell::Bash);
        for sub in ["encrypt", "decrypt", "inspect", "seal-key"] {
            assert!(bash.contains(sub), "missing {sub}");
        }
    }

    #[test]
    fn zsh_script_names_the_binary() {
        assert!(script(Shell::Zsh).contains("regseal"));
    }
}
