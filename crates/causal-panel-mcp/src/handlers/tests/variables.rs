//! get_variable_descriptions handler tests.

use serde_json::json;

use super::{content_text, create_test_handlers, tool_call};

#[tokio::test]
async fn test_descriptions_list_all_five_variables() {
    let handlers = create_test_handlers();
    let request = tool_call("get_variable_descriptions", json!({}));

    let response = handlers.dispatch(request).await;
    let text = content_text(&response);
    let parsed: serde_json::Value = serde_json::from_str(&text).expect("listing is JSON");
    let map = parsed.as_object().expect("listing is an object");
    assert_eq!(map.len(), 5);
    for name in ["treatment", "pre_spends", "post_spends", "signup_month", "Z"] {
        assert!(map.contains_key(name), "missing {name}");
    }
}

/// Calling the tool twice yields identical mappings; nothing mutates the
/// shared state between calls.
#[tokio::test]
async fn test_descriptions_are_idempotent() {
    let handlers = create_test_handlers();

    let first = handlers
        .dispatch(tool_call("get_variable_descriptions", json!({})))
        .await;
    let second = handlers
        .dispatch(tool_call("get_variable_descriptions", json!({})))
        .await;

    assert_eq!(content_text(&first), content_text(&second));
    assert!(!content_text(&first).is_empty());
}
