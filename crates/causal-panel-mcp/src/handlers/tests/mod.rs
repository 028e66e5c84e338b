//! Handler tests driving the JSON-RPC dispatch path end to end.

mod lifecycle;
mod variables;

use std::sync::Arc;

use serde_json::{json, Value};

use causal_panel_core::{AppContext, Config};

use crate::handlers::Handlers;
use crate::protocol::{JsonRpcId, JsonRpcRequest, JsonRpcResponse};

/// Handlers over a small seeded panel so tests are fast and deterministic.
fn create_test_handlers() -> Handlers {
    let mut config = Config::default();
    config.dataset.num_users = 400;
    config.dataset.seed = Some(7);
    let context = AppContext::initialize(config).expect("test context initializes");
    Handlers::new(Arc::new(context))
}

fn make_request(method: &str, id: Option<JsonRpcId>, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id,
        method: method.to_string(),
        params,
    }
}

/// Build a `tools/call` request for the named tool.
fn tool_call(name: &str, arguments: Value) -> JsonRpcRequest {
    make_request(
        "tools/call",
        Some(JsonRpcId::Number(1)),
        Some(json!({ "name": name, "arguments": arguments })),
    )
}

/// Extract the text of the first content block of a tool result.
fn content_text(response: &JsonRpcResponse) -> String {
    response
        .result
        .as_ref()
        .and_then(|result| result.get("content"))
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(|text| text.as_str())
        .unwrap_or_default()
        .to_string()
}

/// True when the tool result is flagged `isError`.
fn is_error_result(response: &JsonRpcResponse) -> bool {
    response
        .result
        .as_ref()
        .and_then(|result| result.get("isError"))
        .and_then(|flag| flag.as_bool())
        .unwrap_or(false)
}
