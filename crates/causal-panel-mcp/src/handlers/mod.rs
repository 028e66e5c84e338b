//! Request handlers for MCP methods.
//!
//! All tool access is via `tools/list` and `tools/call`; the three exposed
//! tools are `get_causal_estimate`, `query_relationship`, and
//! `get_variable_descriptions`.

mod causal_tools;
mod dispatch;
mod handlers;
mod lifecycle;

#[cfg(test)]
mod tests;

pub use self::handlers::Handlers;
