//! Output rendering for CLI commands.

use colored::Colorize;
use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Types that render in either output format.
pub trait Render: Serialize {
    /// Human-readable rendering.
    fn render_human(&self) -> String;

    /// JSON rendering.
    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    /// Render in the requested format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    pub required: Vec<String>,
}

/// Output of `maximumsats tools`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolListOutput {
    pub tools: Vec<ToolSummary>,
}

impl Render for ToolListOutput {
    fn render_human(&self) -> String {
        let mut out = format!("{} tools\n", self.tools.len().to_string().bold());
        for tool in &self.tools {
            out.push('\n');
            out.push_str(&format!("{}", tool.name.cyan().bold()));
            if !tool.required.is_empty() {
                out.push_str(&format!(" ({})", tool.required.join(", ")));
            }
            out.push('\n');
            out.push_str(&format!("  {}\n", tool.description));
        }
        out
    }
}

/// Output of `maximumsats call`.
#[derive(Debug, Clone, Serialize)]
pub struct CallOutput {
    pub tool: String,
    pub is_error: bool,
    pub text: String,
}

impl Render for CallOutput {
    fn render_human(&self) -> String {
        self.text.clone()
    }
}
