//! CLI command implementations.

pub mod call;
pub mod completions;
pub mod mcp_server;
pub mod tools;

pub use call::call;
pub use completions::completions;
pub use mcp_server::mcp_server;
pub use tools::tools;
