// File: response.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use std::borrow::Cow;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Reconstructed response handed back to the listener/CLI layer.
///
/// Always well-formed, whatever the vulnerable endpoint returned. The body
/// is kept as raw bytes; leaked binaries pass through untouched. `url` and
/// `duration_ms` are filled in by the dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct SsrfResponse {
    pub status: u16,
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub mime: String,
    pub url: String,
    pub duration_ms: u64,
}

impl SsrfResponse {
    /// Lossy text view of the body, for display and rule matching.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

static STATUS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^HTTP/\d(?:\.\d)?\s+(\d{3})(?:\s+(.*))?$").unwrap());

/// Ordered status fingerprints, checked only when the payload carries no
/// parseable status line. First match wins; no match means 200.
static STATUS_FINGERPRINTS: Lazy<Vec<(Regex, u16)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?im)^location:\s*\S+").unwrap(), 302),
        (Regex::new(r"(?i)<title>\s*301 moved permanently").unwrap(), 301),
        (Regex::new(r"(?i)400 bad request").unwrap(), 400),
        (Regex::new(r"(?i)401 unauthorized").unwrap(), 401),
        (Regex::new(r"(?i)403 forbidden").unwrap(), 403),
        (Regex::new(r"(?i)404 not found").unwrap(), 404),
        (Regex::new(r"(?i)405 method not allowed").unwrap(), 405),
        (Regex::new(r"(?i)500 internal server error").unwrap(), 500),
        (Regex::new(r"(?i)502 bad gateway").unwrap(), 502),
        (Regex::new(r"(?i)503 service unavailable").unwrap(), 503),
    ]
});

/// Magic-byte prefixes, highest priority sniffing signal.
static MAGIC_PREFIXES: [(&[u8], &str); 7] = [
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b", "application/gzip"),
];

static HTML_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<!doctype\s+html|<html[\s>]|<head[\s>]|<body[\s>]").unwrap());

/// Rebuild a well-formed response from whatever the vulnerable endpoint
/// leaked. Never fails: a payload that is not a valid HTTP response gets a
/// guessed status and a sniffed MIME type instead, and the body bytes are
/// returned exactly as received either way.
pub fn reconstruct(raw: &[u8]) -> SsrfResponse {
    if let Some((status, status_line, headers, body)) = parse_embedded_response(raw) {
        let mime = declared_mime(&headers).unwrap_or_else(|| sniff_mime(&body));
        debug!("Reconstructed embedded response: {} ({})", status, mime);
        return SsrfResponse {
            status,
            status_line,
            headers,
            body,
            mime,
            url: String::new(),
            duration_ms: 0,
        };
    }

    let status = guess_status(&String::from_utf8_lossy(raw));
    let mime = sniff_mime(raw);
    debug!("Guessed response: {} ({})", status, mime);
    SsrfResponse {
        status,
        status_line: format!("HTTP/1.1 {} {}", status, reason_phrase(status)),
        headers: Vec::new(),
        body: raw.to_vec(),
        mime,
        url: String::new(),
        duration_ms: 0,
    }
}

/// Parse a full HTTP response carried inside the payload, if there is one.
/// The head must be UTF-8; the body is sliced out of the original bytes.
fn parse_embedded_response(raw: &[u8]) -> Option<(u16, String, Vec<(String, String)>, Vec<u8>)> {
    let (head, body) = match find_blank_line(raw) {
        Some((head_end, body_start)) => (&raw[..head_end], &raw[body_start..]),
        None => (raw, &raw[raw.len()..]),
    };
    let head = std::str::from_utf8(head).ok()?;

    let mut lines = head.lines();
    let first_line = lines.next()?;
    let caps = STATUS_LINE.captures(first_line)?;
    let status: u16 = caps.get(1)?.as_str().parse().ok()?;

    let mut headers = Vec::new();
    for line in lines {
        // A bare line where a header belongs means this is not really an
        // HTTP head; treat the whole payload as opaque.
        let (name, value) = line.split_once(':')?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    Some((status, first_line.to_string(), headers, body.to_vec()))
}

/// Position of the earliest blank line separating head from body.
fn find_blank_line(raw: &[u8]) -> Option<(usize, usize)> {
    let mut found: Option<(usize, usize)> = None;
    for sep in [&b"\r\n\r\n"[..], &b"\n\n"[..]] {
        if let Some(idx) = raw.windows(sep.len()).position(|w| w == sep) {
            if found.map_or(true, |(at, _)| idx < at) {
                found = Some((idx, idx + sep.len()));
            }
        }
    }
    found
}

/// Best-effort status for a payload with no status line.
pub fn guess_status(text: &str) -> u16 {
    for (fingerprint, status) in STATUS_FINGERPRINTS.iter() {
        if fingerprint.is_match(text) {
            return *status;
        }
    }
    200
}

fn declared_mime(headers: &[(String, String)]) -> Option<String> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| {
            value
                .split(';')
                .next()
                .unwrap_or(value)
                .trim()
                .to_ascii_lowercase()
        })
        .filter(|v| !v.is_empty())
}

/// Content sniffing, in fixed priority order: magic bytes, markup shape,
/// JSON shape, printable text, then the generic binary fallback.
pub fn sniff_mime(raw: &[u8]) -> String {
    for (prefix, mime) in MAGIC_PREFIXES.iter() {
        if raw.starts_with(prefix) {
            return (*mime).to_string();
        }
    }

    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml") {
        return "application/xml".to_string();
    }
    if HTML_SHAPE.is_match(trimmed) {
        return "text/html".to_string();
    }
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return "application/json".to_string();
    }
    if !raw.is_empty() && std::str::from_utf8(raw).is_ok() {
        let printable = raw
            .iter()
            .filter(|b| !b.is_ascii_control() || b.is_ascii_whitespace())
            .count();
        if printable * 10 >= raw.len() * 9 {
            return "text/plain".to_string();
        }
    }
    "application/octet-stream".to_string()
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
