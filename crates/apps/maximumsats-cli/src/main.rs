//! MaximumSats CLI entry point.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Install the tracing subscriber.
///
/// Logs go to stderr; stdout is reserved for command output and, under
/// `mcp-server`, the MCP protocol itself.
fn init_logging(verbose: bool) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        if let Ok(directive) = "maximumsats=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<String> {
    let format = OutputFormat::from(cli.format);

    match cli.command {
        Commands::McpServer { timeout_secs } => commands::mcp_server(timeout_secs).await,
        Commands::Tools => commands::tools(format),
        Commands::Call {
            tool,
            args,
            timeout_secs,
        } => commands::call(&tool, args.as_deref(), timeout_secs, format).await,
        Commands::Completions { shell } => commands::completions(shell),
    }
}

fn print_error(error: &CliError) {
    eprintln!(
        "{} [{}]: {}",
        "Error".red().bold(),
        error.error_code(),
        error
    );
    if let Some(hint) = error.suggestion() {
        eprintln!("{} {}", "Hint:".yellow(), hint);
    }
}
