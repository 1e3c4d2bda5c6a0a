// File: rules_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

#[cfg(test)]
mod tests {
    use crate::error::SsrfError;
    use crate::rules::{RuleEngine, RulePhase, RuleSpec};
    use pretty_assertions::assert_eq;

    fn engine(specs: &[RuleSpec]) -> RuleEngine {
        RuleEngine::compile(specs).unwrap()
    }

    #[test]
    fn test_empty_engine_passthrough() {
        let e = RuleEngine::default();
        assert!(e.is_empty());
        assert_eq!(e.apply(RulePhase::RequestBody, "untouched"), "untouched");
    }

    #[test]
    fn test_non_matching_rule_is_noop() {
        let e = engine(&[RuleSpec::new(
            "never-present",
            "x",
            &[RulePhase::ResponseBody],
        )]);
        assert_eq!(e.apply(RulePhase::ResponseBody, "hello"), "hello");
    }

    #[test]
    fn test_phase_filtering() {
        let e = engine(&[RuleSpec::new("secret", "REDACTED", &[RulePhase::ResponseBody])]);
        assert_eq!(e.apply(RulePhase::ResponseBody, "a secret here"), "a REDACTED here");
        // Same text in a request phase is untouched.
        assert_eq!(e.apply(RulePhase::RequestBody, "a secret here"), "a secret here");
    }

    #[test]
    fn test_rules_run_in_order() {
        // Second rule must see the first rule's output.
        let e = engine(&[
            RuleSpec::new("foo", "bar", &[RulePhase::RequestLine]),
            RuleSpec::new("bar", "baz", &[RulePhase::RequestLine]),
        ]);
        assert_eq!(e.apply(RulePhase::RequestLine, "foo"), "baz");
    }

    #[test]
    fn test_capture_group_replacement() {
        let e = engine(&[RuleSpec::new(
            r"Host: ([\w.]+)",
            "Host: internal-$1",
            &[RulePhase::RequestHeaders],
        )]);
        assert_eq!(
            e.apply(RulePhase::RequestHeaders, "Host: example.com"),
            "Host: internal-example.com"
        );
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let e = engine(&[RuleSpec::new("a", "b", &[RulePhase::RequestBody])]);
        assert_eq!(e.apply(RulePhase::RequestBody, "aaa"), "bbb");
    }

    #[test]
    fn test_rule_with_multiple_phases() {
        let e = engine(&[RuleSpec::new(
            "token",
            "****",
            &[RulePhase::RequestHeaders, RulePhase::ResponseHeaders],
        )]);
        assert_eq!(e.apply(RulePhase::RequestHeaders, "x-token: 1"), "x-****: 1");
        assert_eq!(e.apply(RulePhase::ResponseHeaders, "x-token: 1"), "x-****: 1");
    }

    #[test]
    fn test_invalid_pattern_rejected_at_compile() {
        let err = RuleEngine::compile(&[RuleSpec::new("(unclosed", "x", &[RulePhase::RequestBody])])
            .unwrap_err();
        assert!(matches!(err, SsrfError::InvalidConfiguration(_)));
    }
}
