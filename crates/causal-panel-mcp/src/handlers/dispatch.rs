//! Request dispatch logic for MCP handlers.

use serde_json::json;
use tracing::debug;

use crate::protocol::{error_codes, methods, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
use crate::tools::get_tool_definitions;

use super::Handlers;

impl Handlers {
    /// Dispatch a request to the appropriate handler.
    ///
    /// All tool access is via `tools/list` and `tools/call`; direct method
    /// calls are not supported.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Dispatching method: {}", request.method);

        match request.method.as_str() {
            // MCP lifecycle methods
            methods::INITIALIZE => self.handle_initialize(request.id).await,
            methods::INITIALIZED => self.handle_initialized_notification(),
            methods::SHUTDOWN => self.handle_shutdown(request.id).await,

            // MCP tools protocol
            methods::TOOLS_LIST => self.handle_tools_list(request.id).await,
            methods::TOOLS_CALL => self.handle_tools_call(request.id, request.params).await,

            // Unknown method
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!(
                    "Method not found: {}. Use tools/call for tool access.",
                    request.method
                ),
            ),
        }
    }

    pub(super) async fn handle_tools_list(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": get_tool_definitions() }))
    }

    pub(super) async fn handle_tools_call(
        &self,
        id: Option<JsonRpcId>,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "tools/call requires params with a tool name",
            );
        };
        let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "tools/call params must include a string \"name\"",
            );
        };
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        match name {
            "get_causal_estimate" => self.call_get_causal_estimate(id, arguments).await,
            "query_relationship" => self.call_query_relationship(id, arguments).await,
            "get_variable_descriptions" => self.call_get_variable_descriptions(id).await,
            other => JsonRpcResponse::error(
                id,
                error_codes::TOOL_NOT_FOUND,
                format!("Unknown tool: {other}"),
            ),
        }
    }
}
