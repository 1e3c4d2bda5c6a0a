// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use std::path::PathBuf;

use crate::rules::RuleSpec;

/// Construction-time options for [`crate::http::SsrfHttp`].
///
/// Every option is an explicit named field; there is no dynamic option bag.
/// Exactly one of `url` and `file` must be set. All options are validated
/// once by `SsrfHttp::new` and are immutable afterwards.
#[derive(Debug, Clone)]
pub struct SsrfConfig {
    /// Templated target URL containing the `xxURLxx` placeholder.
    pub url: Option<String>,
    /// File whose first non-empty line is the templated target URL.
    /// Mutually exclusive with `url`.
    pub file: Option<PathBuf>,
    /// Outbound HTTP verb for the vulnerable endpoint.
    pub method: String,
    /// Body template; may carry the placeholder for POST-style injection.
    pub post_data: Option<String>,
    /// Default headers sent with every outbound request.
    pub headers: Vec<(String, String)>,
    /// Default cookie string sent with every outbound request.
    pub cookies: Option<String>,
    /// Let the client request's method replace `method`.
    pub forward_method: bool,
    /// Forward client request headers to the vulnerable endpoint.
    pub forward_headers: bool,
    /// Merge client cookies with the configured ones.
    pub forward_cookies: bool,
    /// Let the client request's body replace `post_data`.
    pub forward_body: bool,
    /// IP obfuscation scheme name, from the encoder registry.
    pub ip_encoding: Option<String>,
    /// Upstream proxy spec, `scheme://host:port`.
    pub proxy: Option<String>,
    /// Ordered rewrite rules.
    pub rules: Vec<RuleSpec>,
    /// Skip TLS certificate verification on the outbound leg.
    pub insecure: bool,
    /// Per-request timeout in seconds.
    pub timeout: u64,
}

impl Default for SsrfConfig {
    fn default() -> Self {
        Self {
            url: None,
            file: None,
            method: "GET".to_string(),
            post_data: None,
            headers: Vec::new(),
            cookies: None,
            forward_method: false,
            forward_headers: false,
            forward_cookies: false,
            forward_body: false,
            ip_encoding: None,
            proxy: None,
            rules: Vec::new(),
            insecure: false,
            timeout: 10,
        }
    }
}

impl SsrfConfig {
    /// Config with the given templated target URL and defaults elsewhere.
    pub fn with_url(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
