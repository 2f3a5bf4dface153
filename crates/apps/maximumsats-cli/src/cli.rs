//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// MaximumSats CLI.
#[derive(Parser, Debug)]
#[command(name = "maximumsats")]
#[command(author = "MaximumSats Contributors")]
#[command(version)]
#[command(about = "MCP server for MaximumSats Lightning-paid AI and Web of Trust tools")]
#[command(
    long_about = "Serves the MaximumSats tool catalog to AI assistants over MCP (stdio).\n\nPaid tools return a Lightning invoice first; pay it, then call again with the payment_hash.\n\nRun 'maximumsats mcp-server' from your MCP host configuration."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the MCP server on stdio.
    ///
    /// Runs until the host closes the connection. Logs go to stderr.
    McpServer {
        /// Upstream request timeout in seconds.
        #[arg(long, default_value = "30", value_parser = parse_timeout_secs)]
        timeout_secs: u64,
    },

    /// List the tool catalog.
    Tools,

    /// Invoke one tool once against the live upstream.
    ///
    /// Prints the tool's text result. Exits non-zero when the tool reports
    /// an error.
    Call {
        /// Tool name (see 'maximumsats tools').
        tool: String,

        /// Tool arguments as a JSON object.
        #[arg(short, long)]
        args: Option<String>,

        /// Upstream request timeout in seconds.
        #[arg(long, default_value = "30", value_parser = parse_timeout_secs)]
        timeout_secs: u64,
    },

    // =========================================================================
    // Shell Completion Commands
    // =========================================================================
    /// Generate shell completions.
    ///
    /// Outputs shell completion scripts for various shells.
    Completions {
        /// Shell to generate completions for.
        shell: CompletionShell,
    },
}

/// Shell types for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    PowerShell,
}

/// Parse a timeout, rejecting zero.
fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of seconds", s))?;
    if value == 0 {
        return Err("Timeout must be at least 1 second".to_string());
    }
    Ok(value)
}
