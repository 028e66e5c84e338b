//! Causal tool handlers.
//!
//! Implements the three exposed tools:
//! - get_causal_estimate: backdoor identification plus estimator fallback
//! - query_relationship: which identification criteria apply
//! - get_variable_descriptions: the static variable listing
//!
//! Every engine error is converted into a descriptive text result here;
//! nothing below this layer reaches the transport as an exception.

use serde::Deserialize;
use tracing::{debug, warn};

use causal_panel_core::estimate::{default_candidates, estimate};
use causal_panel_core::identify::identify;

use crate::protocol::{error_codes, JsonRpcId, JsonRpcResponse};

use super::Handlers;

/// Arguments shared by the two pairwise tools. Absent fields parse as
/// empty strings so emptiness is reported as a validation message rather
/// than a params error.
#[derive(Debug, Deserialize)]
struct PairRequest {
    #[serde(default)]
    treatment: String,
    #[serde(default)]
    outcome: String,
}

impl Handlers {
    /// Handle the get_causal_estimate tool call.
    ///
    /// Identification is restricted to the backdoor criterion; estimation
    /// walks the candidate methods in order and reports the first finite
    /// estimate together with the method that produced it.
    pub(super) async fn call_get_causal_estimate(
        &self,
        id: Option<JsonRpcId>,
        arguments: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: PairRequest = match serde_json::from_value(arguments) {
            Ok(request) => request,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                );
            }
        };

        if request.treatment.is_empty() || request.outcome.is_empty() {
            warn!(
                treatment = %request.treatment,
                outcome = %request.outcome,
                "get_causal_estimate: empty variable name"
            );
            return self.tool_text_error(
                id,
                format!(
                    "Error: treatment ({}) or outcome ({}) is not defined correctly.",
                    request.treatment, request.outcome
                ),
            );
        }

        let estimand = match identify(&self.context.graph, &request.treatment, &request.outcome) {
            Ok(estimand) => estimand,
            Err(e) => {
                debug!(error = %e, "get_causal_estimate: identification failed");
                return self.tool_text_error(id, format!("Error identifying causal effect: {e}"));
            }
        };
        if let Err(e) = estimand.require_backdoor() {
            debug!(error = %e, "get_causal_estimate: no backdoor estimand");
            return self.tool_text_error(id, format!("Error identifying causal effect: {e}"));
        }

        match estimate(&estimand, &self.context.cohort, &default_candidates()) {
            Ok(result) => self.tool_text(
                id,
                format!(
                    "Estimated causal effect using {}: {}",
                    result.method, result.value
                ),
            ),
            Err(e) => self.tool_text(id, format!("{e}.")),
        }
    }

    /// Handle the query_relationship tool call.
    ///
    /// Both names must be known variables; otherwise the full description
    /// mapping is echoed back so the caller can correct itself.
    pub(super) async fn call_query_relationship(
        &self,
        id: Option<JsonRpcId>,
        arguments: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: PairRequest = match serde_json::from_value(arguments) {
            Ok(request) => request,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                );
            }
        };

        let descriptions = &self.context.descriptions;
        let mut missing = String::new();
        if !descriptions.contains_key(request.treatment.as_str()) {
            missing.push_str("The treatment variable name was not recognized.\n");
        }
        if !descriptions.contains_key(request.outcome.as_str()) {
            missing.push_str("The outcome variable name was not recognized.\n");
        }
        if !missing.is_empty() {
            let listing =
                serde_json::to_string(descriptions).expect("description mapping serializes");
            missing.push_str("Here is the list of known variables: ");
            missing.push_str(&listing);
            return self.tool_text_error(id, missing);
        }

        match identify(&self.context.graph, &request.treatment, &request.outcome) {
            Ok(estimand) => {
                let strategies = estimand.strategies();
                if strategies.is_empty() {
                    self.tool_text(
                        id,
                        format!(
                            "No identifiable causal effect for {} -> {} using standard criteria.",
                            request.treatment, request.outcome
                        ),
                    )
                } else {
                    let criteria = strategies
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.tool_text(
                        id,
                        format!(
                            "The causal effect is identifiable and can be obtained using \
                             these criteria: {criteria}."
                        ),
                    )
                }
            }
            Err(e) => self.tool_text_error(
                id,
                format!(
                    "Error constructing causal model: {e}. No identifiable causal effect \
                     for {} -> {}.",
                    request.treatment, request.outcome
                ),
            ),
        }
    }

    /// Handle the get_variable_descriptions tool call.
    pub(super) async fn call_get_variable_descriptions(
        &self,
        id: Option<JsonRpcId>,
    ) -> JsonRpcResponse {
        let listing = serde_json::to_string_pretty(&self.context.descriptions)
            .expect("description mapping serializes");
        self.tool_text(id, listing)
    }
}
