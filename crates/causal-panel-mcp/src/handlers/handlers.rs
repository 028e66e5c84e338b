//! Handlers struct definition and response helpers.

use std::sync::Arc;

use serde_json::json;

use causal_panel_core::AppContext;

use crate::protocol::{JsonRpcId, JsonRpcResponse};

/// Request handlers for the MCP protocol.
///
/// Stateless beyond the shared immutable [`AppContext`]; every tool call
/// reads the same panel, cohort frame, graph, and descriptions.
pub struct Handlers {
    pub(in crate::handlers) context: Arc<AppContext>,
}

impl Handlers {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    /// Wrap text in an MCP tool-result content block.
    pub(in crate::handlers) fn tool_text(
        &self,
        id: Option<JsonRpcId>,
        text: impl Into<String>,
    ) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": text.into() }]
            }),
        )
    }

    /// Wrap text in a tool-result content block flagged as an error.
    ///
    /// Validation and engine failures stay inside the tool result: the
    /// boundary never propagates an internal error to the transport layer.
    pub(in crate::handlers) fn tool_text_error(
        &self,
        id: Option<JsonRpcId>,
        text: impl Into<String>,
    ) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": text.into() }],
                "isError": true
            }),
        )
    }
}
