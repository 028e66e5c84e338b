//! MCP lifecycle handlers.

use serde_json::json;
use tracing::info;

use crate::protocol::{JsonRpcId, JsonRpcResponse};

use super::Handlers;

impl Handlers {
    /// Handle MCP initialize request.
    ///
    /// Returns server capabilities following the MCP 2024-11-05 protocol
    /// specification.
    pub(super) async fn handle_initialize(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!("Handling initialize request");

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": "causal-panel-mcp",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    /// Handle notifications/initialized, which is a notification, not a request.
    ///
    /// Notifications don't get a response per the JSON-RPC 2.0 spec.
    pub(super) fn handle_initialized_notification(&self) -> JsonRpcResponse {
        info!("Client initialized notification received");
        JsonRpcResponse::none()
    }

    /// Handle MCP shutdown request.
    pub(super) async fn handle_shutdown(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!("Handling shutdown request");
        JsonRpcResponse::success(id, json!(null))
    }
}
