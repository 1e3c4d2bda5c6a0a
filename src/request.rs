// File: request.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use log::debug;
use url::Url;

use crate::error::SsrfError;
use crate::target::is_supported_method;

/// Per-call overrides accepted by [`crate::http::SsrfHttp::send_uri`].
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub method: Option<String>,
    pub headers: Vec<(String, String)>,
    pub cookies: Option<String>,
    pub body: Option<Vec<u8>>,
}

/// Normalized client request, one per forwarding call.
///
/// `url` is the attacker-chosen destination that will be substituted into
/// the target template's placeholder. Headers keep their original order and
/// duplicates. The body is opaque bytes and is forwarded untouched unless a
/// body-phase rule rewrites it.
#[derive(Debug, Clone)]
pub struct ClientRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<String>,
    pub body: Option<Vec<u8>>,
}

impl ClientRequest {
    /// Parse a raw HTTP request as received from a proxied client.
    ///
    /// Requires a three-token request line with a recognized verb, a header
    /// block terminated by a blank line, and either an absolute-form target
    /// or a `Host` header to derive the destination from.
    pub fn parse(raw: &str) -> Result<Self, SsrfError> {
        if raw.is_empty() {
            return Err(SsrfError::InvalidClientRequest("empty request".to_string()));
        }

        let (head, body) = split_head_body(raw)?;
        let mut lines = head.lines();
        let request_line = lines
            .next()
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| SsrfError::InvalidClientRequest("missing request line".to_string()))?;

        let parts: Vec<&str> = request_line.split_whitespace().collect();
        let [method, target, version] = parts.as_slice() else {
            return Err(SsrfError::InvalidClientRequest(format!(
                "malformed request line: {}",
                request_line
            )));
        };
        let (method, target, version) = (*method, *target, *version);
        if !version.starts_with("HTTP/") {
            return Err(SsrfError::InvalidClientRequest(format!(
                "bad protocol version: {}",
                version
            )));
        }
        if !is_supported_method(method) {
            return Err(SsrfError::InvalidClientRequest(format!(
                "unsupported method: {}",
                method
            )));
        }

        let mut headers = Vec::new();
        let mut cookies = Vec::new();
        let mut host = None;
        for line in lines {
            let (name, value) = line.split_once(':').ok_or_else(|| {
                SsrfError::InvalidClientRequest(format!("malformed header: {}", line))
            })?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() {
                return Err(SsrfError::InvalidClientRequest(format!(
                    "malformed header: {}",
                    line
                )));
            }
            // Host and Cookie are framing, not forwardable content; the
            // outbound leg derives its own host and rebuilds the cookie
            // header from the merged jar.
            if name.eq_ignore_ascii_case("host") {
                if host.is_none() {
                    host = Some(value.to_string());
                }
                continue;
            }
            if name.eq_ignore_ascii_case("cookie") {
                for cookie in value.split(';') {
                    let cookie = cookie.trim();
                    if !cookie.is_empty() {
                        cookies.push(cookie.to_string());
                    }
                }
                continue;
            }
            headers.push((name.to_string(), value.to_string()));
        }

        let url = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            let host = host.ok_or_else(|| {
                SsrfError::InvalidClientRequest(
                    "no Host header and request target is not absolute".to_string(),
                )
            })?;
            format!("http://{}{}", host, target)
        };
        validate_destination(&url)?;

        debug!("Parsed client request: {} {}", method, url);

        Ok(Self {
            method: method.to_ascii_uppercase(),
            url,
            headers,
            cookies,
            body: body.filter(|b| !b.is_empty()).map(String::into_bytes),
        })
    }

    /// Build a client request from a destination URI plus structured
    /// overrides, the `send_uri` path.
    pub fn from_uri(target: &str, overrides: RequestOverrides) -> Result<Self, SsrfError> {
        validate_destination(target)?;

        let mut cookies = Vec::new();
        if let Some(raw) = overrides.cookies.as_deref() {
            for cookie in raw.split(';') {
                let cookie = cookie.trim();
                if !cookie.is_empty() {
                    cookies.push(cookie.to_string());
                }
            }
        }

        Ok(Self {
            method: overrides
                .method
                .map(|m| m.to_ascii_uppercase())
                .unwrap_or_default(),
            url: target.to_string(),
            headers: overrides.headers,
            cookies,
            body: overrides.body,
        })
    }
}

fn split_head_body(raw: &str) -> Result<(&str, Option<String>), SsrfError> {
    // Whichever blank line comes first ends the header block.
    let earliest = ["\r\n\r\n", "\n\n"]
        .iter()
        .filter_map(|sep| raw.find(sep).map(|idx| (idx, sep.len())))
        .min_by_key(|(idx, _)| *idx);
    match earliest {
        Some((idx, sep_len)) => {
            let body = &raw[idx + sep_len..];
            let body = (!body.is_empty()).then(|| body.to_string());
            Ok((&raw[..idx], body))
        }
        None => Err(SsrfError::InvalidClientRequest(
            "no blank line terminating the header block".to_string(),
        )),
    }
}

fn validate_destination(target: &str) -> Result<(), SsrfError> {
    if target.is_empty() {
        return Err(SsrfError::InvalidClientRequest(
            "empty destination".to_string(),
        ));
    }
    let url = Url::parse(target)
        .map_err(|e| SsrfError::InvalidClientRequest(format!("{}: {}", target, e)))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(SsrfError::InvalidClientRequest(format!(
                "unsupported destination scheme: {}",
                other
            )))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(SsrfError::InvalidClientRequest(format!(
            "no host in {}",
            target
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
