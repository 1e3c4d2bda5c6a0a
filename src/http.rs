// File: http.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::{Host, Position, Url};

use crate::config::SsrfConfig;
use crate::error::SsrfError;
use crate::ip_encoder::IpEncoding;
use crate::request::{ClientRequest, RequestOverrides};
use crate::response::{self, SsrfResponse};
use crate::rules::{RuleEngine, RulePhase};
use crate::target::{is_supported_method, TargetTemplate, UpstreamProxy};

/// Headers never forwarded from the client; the outbound leg computes its
/// own framing and the template URL supplies the host.
const STRIPPED_HEADERS: [&str; 5] = [
    "host",
    "content-length",
    "connection",
    "proxy-connection",
    "transfer-encoding",
];

/// The forwarding core.
///
/// Fully validated at construction; immutable and `Send + Sync` afterwards,
/// so one instance can serve concurrent forwarding calls. Per-call failures
/// never invalidate the instance.
#[derive(Debug, Clone)]
pub struct SsrfHttp {
    target: TargetTemplate,
    rules: RuleEngine,
    ip_encoding: Option<IpEncoding>,
    upstream: Option<UpstreamProxy>,
    config: SsrfConfig,
    client: reqwest::Client,
}

impl SsrfHttp {
    /// Validate the configuration and freeze the core.
    ///
    /// Everything that can be rejected is rejected here; no network I/O
    /// happens until the first forwarding call.
    pub fn new(config: SsrfConfig) -> Result<Self, SsrfError> {
        let target = TargetTemplate::from_config(&config)?;
        let ip_encoding = config
            .ip_encoding
            .as_deref()
            .map(IpEncoding::from_name)
            .transpose()?;
        let upstream = config
            .proxy
            .as_deref()
            .map(UpstreamProxy::parse)
            .transpose()?;
        let rules = RuleEngine::compile(&config.rules)?;

        // Configured default headers and cookies are part of the
        // configuration; reject illegal ones here, not on the first call.
        for (name, value) in &config.headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                SsrfError::InvalidConfiguration(format!("bad header name: {}", name))
            })?;
            HeaderValue::from_str(value).map_err(|_| {
                SsrfError::InvalidConfiguration(format!("bad header value for {}", name))
            })?;
        }
        if let Some(cookies) = config.cookies.as_deref() {
            HeaderValue::from_str(cookies).map_err(|_| {
                SsrfError::InvalidConfiguration(format!("bad cookie string: {}", cookies))
            })?;
        }

        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout))
            .danger_accept_invalid_certs(config.insecure);
        if let Some(proxy) = &upstream {
            let proxy = reqwest::Proxy::all(proxy.url())
                .map_err(|e| SsrfError::InvalidUpstreamProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| SsrfError::InvalidConfiguration(format!("http client: {}", e)))?;

        if let Some(enc) = ip_encoding {
            debug!("IP encoding: {}", enc);
        }

        Ok(Self {
            target,
            rules,
            ip_encoding,
            upstream,
            config,
            client,
        })
    }

    pub fn scheme(&self) -> &str {
        self.target.scheme()
    }

    pub fn host(&self) -> &str {
        self.target.host()
    }

    pub fn port(&self) -> u16 {
        self.target.port()
    }

    /// The templated target URL, placeholder intact.
    pub fn url(&self) -> &str {
        self.target.url()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.upstream.as_ref().map(UpstreamProxy::url)
    }

    /// Forward a raw client HTTP request through the vulnerable endpoint.
    pub async fn send_request(&self, raw: &str) -> Result<SsrfResponse, SsrfError> {
        let request = ClientRequest::parse(raw)?;
        self.send_http_request(request).await
    }

    /// Forward a destination URI, with optional structured overrides,
    /// through the vulnerable endpoint.
    pub async fn send_uri(
        &self,
        target: &str,
        overrides: RequestOverrides,
    ) -> Result<SsrfResponse, SsrfError> {
        let request = ClientRequest::from_uri(target, overrides)?;
        self.send_http_request(request).await
    }

    /// Build the outbound request, perform the single network exchange, and
    /// reconstruct a response from whatever came back.
    async fn send_http_request(&self, request: ClientRequest) -> Result<SsrfResponse, SsrfError> {
        let destination = self.encode_destination(&request.url);
        info!("Forwarding {} via {}", destination, self.target.url());

        // Request line: substitute the placeholder, then let the rules at it.
        let outbound_url = self.target.resolve_url(&destination);
        let outbound_url = self.rules.apply(RulePhase::RequestLine, &outbound_url);
        let outbound_url = Url::parse(&outbound_url).map_err(|e| {
            SsrfError::InvalidClientRequest(format!("rewritten request URL: {}", e))
        })?;

        let method = self.merge_method(&request)?;
        let headers = self.merge_headers(&request)?;
        let body = self.merge_body(&request, &destination);

        debug!("Outbound request: {} {}", method, outbound_url);

        let mut outbound = self
            .client
            .request(method, outbound_url.clone())
            .headers(headers);
        if let Some(body) = body {
            // Body-phase rules operate on text; a binary body passes
            // through byte for byte.
            let body = match String::from_utf8(body) {
                Ok(text) => self.rules.apply(RulePhase::RequestBody, &text).into_bytes(),
                Err(raw) => raw.into_bytes(),
            };
            outbound = outbound.body(body);
        }

        let started = Instant::now();
        let upstream_response = outbound.send().await?;
        let declared_mime = upstream_response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase());
        let raw = upstream_response.bytes().await?;
        let duration = started.elapsed();

        let mut response = response::reconstruct(&raw);
        if response.mime == "application/octet-stream" {
            if let Some(mime) = declared_mime {
                response.mime = mime;
            }
        }
        response.url = outbound_url.to_string();
        response.duration_ms = duration.as_millis() as u64;

        self.apply_response_rules(&mut response);
        info!(
            "Forwarded {} -> {} in {}ms ({} bytes, {})",
            destination,
            response.status,
            response.duration_ms,
            response.body.len(),
            response.mime
        );
        Ok(response)
    }

    /// Rewrite an IPv4-literal destination host with the configured encoding.
    fn encode_destination(&self, destination: &str) -> String {
        let Some(encoding) = self.ip_encoding else {
            return destination.to_string();
        };
        let Ok(url) = Url::parse(destination) else {
            return destination.to_string();
        };
        match url.host() {
            Some(Host::Ipv4(addr)) => {
                let encoded = encoding.encode(addr);
                debug!("Encoded destination host {} as {}", addr, encoded);
                // Splice at the host's position in the serialization; a
                // plain substring replace could hit userinfo or path text
                // that happens to repeat the address.
                format!(
                    "{}{}{}",
                    &url[..Position::BeforeHost],
                    encoded,
                    &url[Position::AfterHost..]
                )
            }
            _ => destination.to_string(),
        }
    }

    fn merge_method(&self, request: &ClientRequest) -> Result<Method, SsrfError> {
        let method = if self.config.forward_method && !request.method.is_empty() {
            if !is_supported_method(&request.method) {
                return Err(SsrfError::InvalidClientRequest(format!(
                    "unsupported forwarded method: {}",
                    request.method
                )));
            }
            request.method.as_str()
        } else {
            self.target.method()
        };
        Method::from_bytes(method.as_bytes())
            .map_err(|_| SsrfError::InvalidClientRequest(format!("bad method token: {}", method)))
    }

    /// Configured defaults first, client values on top when forwarding is
    /// enabled, cookies folded into one header, then the header-phase rules.
    fn merge_headers(&self, request: &ClientRequest) -> Result<HeaderMap, SsrfError> {
        let mut lines: Vec<(String, String)> = self.config.headers.clone();
        if self.config.forward_headers {
            for (name, value) in &request.headers {
                if STRIPPED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                    continue;
                }
                lines.push((name.clone(), value.clone()));
            }
        }

        let mut cookies: Vec<String> = Vec::new();
        if let Some(configured) = self.config.cookies.as_deref() {
            cookies.extend(
                configured
                    .split(';')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
            );
        }
        if self.config.forward_cookies {
            cookies.extend(request.cookies.iter().cloned());
        }
        if !cookies.is_empty() {
            lines.push(("Cookie".to_string(), cookies.join("; ")));
        }

        let mut map = HeaderMap::new();
        for (name, value) in lines {
            let line = format!("{}: {}", name, value);
            let line = self.rules.apply(RulePhase::RequestHeaders, &line);
            let Some((name, value)) = line.split_once(':') else {
                warn!("Dropping header mangled by rules: {}", line);
                continue;
            };
            let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|_| {
                SsrfError::InvalidClientRequest(format!("bad header name: {}", name))
            })?;
            let value = HeaderValue::from_str(value.trim()).map_err(|_| {
                SsrfError::InvalidClientRequest(format!("bad header value for {}", name))
            })?;
            map.append(name, value);
        }
        Ok(map)
    }

    fn merge_body(&self, request: &ClientRequest, destination: &str) -> Option<Vec<u8>> {
        if self.config.forward_body {
            if let Some(body) = &request.body {
                return Some(body.clone());
            }
        }
        self.target.resolve_body(destination).map(String::into_bytes)
    }

    fn apply_response_rules(&self, response: &mut SsrfResponse) {
        if self.rules.is_empty() {
            return;
        }
        let mut rewritten = Vec::with_capacity(response.headers.len());
        for (name, value) in &response.headers {
            let line = format!("{}: {}", name, value);
            let line = self.rules.apply(RulePhase::ResponseHeaders, &line);
            match line.split_once(':') {
                Some((name, value)) => {
                    rewritten.push((name.trim().to_string(), value.trim().to_string()))
                }
                None => warn!("Dropping response header mangled by rules: {}", line),
            }
        }
        response.headers = rewritten;
        response.body = match String::from_utf8(std::mem::take(&mut response.body)) {
            Ok(text) => self.rules.apply(RulePhase::ResponseBody, &text).into_bytes(),
            Err(raw) => raw.into_bytes(),
        };
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
