//! MCP tool definitions following the MCP 2024-11-05 protocol specification.
//!
//! This module defines the tools available through the server's
//! `tools/list` and `tools/call` endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// MCP tool definition following the protocol specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: String,

    /// Human-readable description of what the tool does
    pub description: String,

    /// JSON Schema defining the tool's input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Get all tool definitions for the `tools/list` response.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "get_causal_estimate",
            "Calculate the estimated treatment effect on the treated using an \
             appropriate backdoor method.",
            json!({
                "type": "object",
                "properties": {
                    "treatment": {
                        "type": "string",
                        "description": "Name of the treatment variable"
                    },
                    "outcome": {
                        "type": "string",
                        "description": "Name of the outcome variable"
                    }
                },
                "required": ["treatment", "outcome"]
            }),
        ),
        ToolDefinition::new(
            "query_relationship",
            "Determine whether the causal effect between a treatment and an \
             outcome variable is identifiable, and report which criteria \
             (backdoor, frontdoor, instrumental variable) can be used.",
            json!({
                "type": "object",
                "properties": {
                    "treatment": {
                        "type": "string",
                        "description": "Name of the treatment variable"
                    },
                    "outcome": {
                        "type": "string",
                        "description": "Name of the outcome variable"
                    }
                },
                "required": ["treatment", "outcome"]
            }),
        ),
        ToolDefinition::new(
            "get_variable_descriptions",
            "List the variables of the spending panel together with their \
             descriptions.",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_tools_are_defined() {
        let tools = get_tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "get_causal_estimate",
                "query_relationship",
                "get_variable_descriptions"
            ]
        );
    }

    #[test]
    fn test_pair_tools_require_both_arguments() {
        for tool in get_tool_definitions().iter().take(2) {
            let required = tool.input_schema["required"].as_array().unwrap();
            assert_eq!(required.len(), 2, "{} schema", tool.name);
        }
    }
}
