//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, CompletionShell};
use crate::error::{CliError, CliResult};

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
        }
    }
}

/// Generate a completion script for `shell`.
pub fn completions(shell: CompletionShell) -> CliResult<String> {
    let mut command = Cli::command();
    let mut buf = Vec::new();
    generate(Shell::from(shell), &mut command, "maximumsats", &mut buf);
    String::from_utf8(buf).map_err(|e| CliError::user(format!("invalid completion output: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let script = completions(CompletionShell::Bash).unwrap();
        assert!(script.contains("maximumsats"));
        assert!(script.contains("mcp-server"));
    }
}
