//! MCP server for MaximumSats.
//!
//! Exposes Bitcoin AI, image generation, and Nostr Web-of-Trust tools to AI
//! assistants over the Model Context Protocol (stdio transport). Each tool
//! maps to exactly one upstream HTTP call.
//!
//! # Payment flow
//!
//! ```text
//! host ──call(tool, args)──▶ server ──request──▶ upstream
//!                                    ◀── challenge (invoice, payment_hash)
//! host ◀── "Payment required: N sats ..."
//!
//! (host pays the invoice out of band)
//!
//! host ──call(tool, args + payment_hash)──▶ server ──request + proof──▶ upstream
//!                                                   ◀── result
//! host ◀── rendered result
//! ```
//!
//! The server keeps no session state between calls. The caller carries the
//! `payment_hash` from the challenge to the retry.
//!
//! # Example
//!
//! ```rust,ignore
//! use maximumsats_mcp::{run_server, McpServerConfig};
//!
//! run_server(McpServerConfig::default()).await?;
//! ```

pub mod catalog;
pub mod error;
pub mod registry;
pub mod server;
pub mod tools;

pub use catalog::{tool_error, PaidAction, Upstream, WotLookup, PAID_ACTIONS};
pub use error::{ToolError, ToolResult};
pub use registry::{ToolDescriptor, ToolRegistry};
pub use server::{run_server, MaximumSatsServer, McpServerConfig};
