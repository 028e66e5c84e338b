//! Lifecycle and protocol-level handler tests.

use serde_json::json;

use crate::protocol::{error_codes, JsonRpcId};

use super::{create_test_handlers, make_request, tool_call};

#[tokio::test]
async fn test_initialize_reports_protocol_and_server_info() {
    let handlers = create_test_handlers();
    let request = make_request("initialize", Some(JsonRpcId::Number(1)), None);

    let response = handlers.dispatch(request).await;
    let result = response.result.expect("initialize succeeds");
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "causal-panel-mcp");
}

#[tokio::test]
async fn test_initialized_notification_has_no_reply() {
    let handlers = create_test_handlers();
    let request = make_request("notifications/initialized", None, None);

    let response = handlers.dispatch(request).await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_tools_list_exposes_the_three_tools() {
    let handlers = create_test_handlers();
    let request = make_request("tools/list", Some(JsonRpcId::Number(2)), None);

    let response = handlers.dispatch(request).await;
    let tools = response.result.expect("tools/list succeeds")["tools"]
        .as_array()
        .expect("tools is an array")
        .clone();
    assert_eq!(tools.len(), 3);
}

#[tokio::test]
async fn test_unknown_method_is_rejected() {
    let handlers = create_test_handlers();
    let request = make_request("memory/store", Some(JsonRpcId::Number(3)), None);

    let response = handlers.dispatch(request).await;
    let error = response.error.expect("unknown method errors");
    assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_tool_is_rejected() {
    let handlers = create_test_handlers();
    let request = tool_call("drop_tables", json!({}));

    let response = handlers.dispatch(request).await;
    let error = response.error.expect("unknown tool errors");
    assert_eq!(error.code, error_codes::TOOL_NOT_FOUND);
}

#[tokio::test]
async fn test_tools_call_requires_params() {
    let handlers = create_test_handlers();
    let request = make_request("tools/call", Some(JsonRpcId::Number(4)), None);

    let response = handlers.dispatch(request).await;
    let error = response.error.expect("missing params errors");
    assert_eq!(error.code, error_codes::INVALID_PARAMS);
}
