// File: target.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use std::fs;

use log::{debug, info};
use url::Url;

use crate::config::SsrfConfig;
use crate::error::SsrfError;

/// Literal token marking the injection point in the templated target.
pub const PLACEHOLDER: &str = "xxURLxx";

/// HTTP verbs the vulnerable endpoint may be driven with.
pub const SUPPORTED_METHODS: [&str; 6] = ["GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS"];

/// Validate a configured verb against the supported set.
pub fn validate_method(method: &str) -> Result<String, SsrfError> {
    let upper = method.to_ascii_uppercase();
    if SUPPORTED_METHODS.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(SsrfError::InvalidSsrfRequestMethod(method.to_string()))
    }
}

/// True when `method` is a legal token for a forwarded client request.
/// Same verb set as [`validate_method`], but callers map a miss to
/// `InvalidClientRequest` because the bad value came from the client.
pub fn is_supported_method(method: &str) -> bool {
    SUPPORTED_METHODS.contains(&method.to_ascii_uppercase().as_str())
}

/// Validated, immutable representation of the vulnerable endpoint.
///
/// Holds the templated URL with its `xxURLxx` placeholder position resolved,
/// the base verb, and the optional body template. Built once by
/// [`crate::http::SsrfHttp::new`]; no mutation is exposed afterwards.
#[derive(Debug, Clone)]
pub struct TargetTemplate {
    url: Url,
    method: String,
    post_data: Option<String>,
}

impl TargetTemplate {
    pub fn from_config(config: &SsrfConfig) -> Result<Self, SsrfError> {
        let raw = match (&config.url, &config.file) {
            (Some(_), Some(_)) => {
                return Err(SsrfError::InvalidConfiguration(
                    "target 'url' and 'file' are mutually exclusive".to_string(),
                ))
            }
            (Some(url), None) => url.clone(),
            (None, Some(path)) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    SsrfError::InvalidSsrfRequest(format!(
                        "cannot read target file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                contents
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        SsrfError::InvalidSsrfRequest(format!(
                            "target file {} is empty",
                            path.display()
                        ))
                    })?
            }
            (None, None) => {
                return Err(SsrfError::InvalidConfiguration(
                    "either target 'url' or 'file' is required".to_string(),
                ))
            }
        };

        let url = parse_target_url(&raw)?;
        let method = validate_method(&config.method)?;

        // Placeholder discovery is a literal-token scan over the URL's
        // userinfo, path and query. A body template carrying the token
        // exempts the URL (POST-style injection).
        let in_url = url_carries_placeholder(&url);
        let in_body = config
            .post_data
            .as_deref()
            .is_some_and(|b| b.contains(PLACEHOLDER));
        if !in_url && !in_body {
            return Err(SsrfError::NoUrlPlaceholder);
        }

        info!(
            "SSRF target: {} {} (placeholder in {})",
            method,
            url,
            if in_url { "URL" } else { "body" }
        );

        Ok(Self {
            url,
            method,
            post_data: config.post_data.clone(),
        })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or_default()
    }

    /// The templated URL, placeholder intact.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn post_data(&self) -> Option<&str> {
        self.post_data.as_deref()
    }

    /// Substitute every placeholder occurrence in the URL with `destination`.
    pub fn resolve_url(&self, destination: &str) -> String {
        self.url.as_str().replace(PLACEHOLDER, destination)
    }

    /// Substitute every placeholder occurrence in the body template.
    pub fn resolve_body(&self, destination: &str) -> Option<String> {
        self.post_data
            .as_deref()
            .map(|b| b.replace(PLACEHOLDER, destination))
    }
}

fn parse_target_url(raw: &str) -> Result<Url, SsrfError> {
    if raw.is_empty() {
        return Err(SsrfError::InvalidSsrfRequest("empty target".to_string()));
    }
    // The WHATWG parser silently strips tabs and newlines, which would let
    // a broken token like "xx\tURLxx" collapse into a real one. Reject
    // control bytes before parsing.
    if raw.bytes().any(|b| b.is_ascii_control()) {
        return Err(SsrfError::InvalidSsrfRequest(
            "target contains control characters".to_string(),
        ));
    }

    let url = Url::parse(raw)
        .map_err(|e| SsrfError::InvalidSsrfRequest(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(SsrfError::InvalidSsrfRequest(format!(
                "unsupported scheme: {}",
                other
            )))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(SsrfError::InvalidSsrfRequest(format!("no host in {}", raw)));
    }
    if url.port() == Some(0) {
        return Err(SsrfError::InvalidSsrfRequest(format!("port 0 in {}", raw)));
    }
    Ok(url)
}

fn url_carries_placeholder(url: &Url) -> bool {
    if url.username().contains(PLACEHOLDER) {
        return true;
    }
    if url.password().is_some_and(|p| p.contains(PLACEHOLDER)) {
        return true;
    }
    if url.path().contains(PLACEHOLDER) {
        return true;
    }
    url.query().is_some_and(|q| q.contains(PLACEHOLDER))
}

/// Validated upstream proxy for the outbound leg.
#[derive(Debug, Clone)]
pub struct UpstreamProxy {
    url: Url,
}

impl UpstreamProxy {
    const SUPPORTED_SCHEMES: [&'static str; 3] = ["http", "https", "socks5"];

    /// Parse and validate a `scheme://host:port` proxy spec.
    pub fn parse(spec: &str) -> Result<Self, SsrfError> {
        // Require authority syntax up front; the WHATWG parser would
        // otherwise accept "http:host:port" and invent the authority.
        if !spec.contains("://") {
            return Err(SsrfError::InvalidUpstreamProxy(format!(
                "not scheme://host:port: {}",
                spec
            )));
        }
        let url = Url::parse(spec)
            .map_err(|e| SsrfError::InvalidUpstreamProxy(format!("{}: {}", spec, e)))?;

        if !Self::SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(SsrfError::InvalidUpstreamProxy(format!(
                "unsupported proxy scheme: {}",
                url.scheme()
            )));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(SsrfError::InvalidUpstreamProxy(format!(
                "no host in {}",
                spec
            )));
        }
        match url.port_or_known_default() {
            None | Some(0) => {
                return Err(SsrfError::InvalidUpstreamProxy(format!(
                    "no usable port in {}",
                    spec
                )))
            }
            Some(_) => {}
        }

        debug!("Upstream proxy: {}", url);
        Ok(Self { url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
