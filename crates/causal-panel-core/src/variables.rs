//! Variable names and caller-facing descriptions.
//!
//! The five names here are the node set of the declared causal graph and the
//! column vocabulary of the panel. The description mapping is static help
//! text used for input validation at the tool boundary; it is never mutated.

use std::collections::BTreeMap;

pub const TREATMENT: &str = "treatment";
pub const PRE_SPENDS: &str = "pre_spends";
pub const POST_SPENDS: &str = "post_spends";
pub const SIGNUP_MONTH: &str = "signup_month";
pub const CONFOUND: &str = "Z";

/// Static variable-description mapping.
///
/// A `BTreeMap` keeps the JSON rendering deterministic across calls.
pub fn variable_descriptions() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        (
            TREATMENT,
            "Treatment indicating whether the user signed up for the program",
        ),
        (PRE_SPENDS, "Amount spent before the treatment"),
        (POST_SPENDS, "Amount spent after the treatment"),
        (CONFOUND, "This is just a confound variable"),
        (
            SIGNUP_MONTH,
            "The month when the user signed up for the program",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions_cover_the_graph_vocabulary() {
        let desc = variable_descriptions();
        assert_eq!(desc.len(), 5);
        for name in [TREATMENT, PRE_SPENDS, POST_SPENDS, SIGNUP_MONTH, CONFOUND] {
            assert!(desc.contains_key(name), "missing description for {name}");
        }
    }

    #[test]
    fn test_descriptions_are_stable_across_calls() {
        assert_eq!(variable_descriptions(), variable_descriptions());
    }
}
