// File: error.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use thiserror::Error;

/// Failure modes of the forwarding core.
///
/// Configuration problems are raised by [`crate::http::SsrfHttp::new`] and
/// never at request time; per-call problems never invalidate the instance.
#[derive(Error, Debug)]
pub enum SsrfError {
    /// The configured target is not a usable absolute http(s) URL.
    #[error("invalid SSRF request target: {0}")]
    InvalidSsrfRequest(String),

    /// The configured method is not a recognized HTTP verb.
    #[error("invalid SSRF request method: {0}")]
    InvalidSsrfRequestMethod(String),

    /// A URL-carried-target method was configured without the placeholder
    /// token anywhere in the URL or body template.
    #[error("no 'xxURLxx' placeholder in target URL or post data")]
    NoUrlPlaceholder,

    /// Unknown IP obfuscation scheme name.
    #[error("invalid IP encoding: {0}")]
    InvalidIpEncoding(String),

    /// Malformed or unsupported upstream proxy specification.
    #[error("invalid upstream proxy: {0}")]
    InvalidUpstreamProxy(String),

    /// Malformed raw request, malformed override, or illegal forwarded method.
    #[error("invalid client request: {0}")]
    InvalidClientRequest(String),

    /// Contradictory or unparseable construction options.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Network, connection, or timeout failure during dispatch.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SsrfError {
    /// True for errors that can only be produced by `SsrfHttp::new`.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SsrfError::InvalidSsrfRequest(_)
                | SsrfError::InvalidSsrfRequestMethod(_)
                | SsrfError::NoUrlPlaceholder
                | SsrfError::InvalidIpEncoding(_)
                | SsrfError::InvalidUpstreamProxy(_)
                | SsrfError::InvalidConfiguration(_)
        )
    }
}
