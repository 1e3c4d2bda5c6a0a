// File: rules.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SsrfError;

/// Where in the request/response cycle a rewrite rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePhase {
    RequestLine,
    RequestHeaders,
    RequestBody,
    ResponseHeaders,
    ResponseBody,
}

/// Uncompiled rule as it appears in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub replacement: String,
    pub phases: Vec<RulePhase>,
}

impl RuleSpec {
    pub fn new(pattern: &str, replacement: &str, phases: &[RulePhase]) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            phases: phases.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    replacement: String,
    phases: Vec<RulePhase>,
}

/// Ordered text-substitution pipeline.
///
/// Rules run in configured order; later rules see the output of earlier
/// ones. A rule that does not match is a no-op. Replacements may reference
/// capture groups (`$1`, `${name}`).
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Compile rule specs, in order. An unparseable pattern is a
    /// construction-time configuration error.
    pub fn compile(specs: &[RuleSpec]) -> Result<Self, SsrfError> {
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            let pattern = Regex::new(&spec.pattern).map_err(|e| {
                SsrfError::InvalidConfiguration(format!("rule pattern '{}': {}", spec.pattern, e))
            })?;
            rules.push(Rule {
                pattern,
                replacement: spec.replacement.clone(),
                phases: spec.phases.clone(),
            });
        }
        debug!("Compiled {} rewrite rules", rules.len());
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule tagged with `phase` over `text`, in order.
    pub fn apply(&self, phase: RulePhase, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            if !rule.phases.contains(&phase) {
                continue;
            }
            if rule.pattern.is_match(&out) {
                trace!("Rule '{}' matched in {:?} phase", rule.pattern, phase);
                out = rule
                    .pattern
                    .replace_all(&out, rule.replacement.as_str())
                    .into_owned();
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
